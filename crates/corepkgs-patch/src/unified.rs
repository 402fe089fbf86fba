//! Unified diff document model
//!
//! A `diff -urN` run produces an optional preamble followed by one section
//! per file. Each section carries its header lines (`diff`, `---`, `+++`,
//! `Binary files ... differ`) and its hunks. The model keeps every line
//! verbatim, line endings included, so rendering an unmodified document
//! reproduces its input byte for byte.

/// Parsed `@@ -a,b +c,d @@` range header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

impl HunkHeader {
    /// Parse a hunk marker line. Omitted lengths default to 1.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix("@@ -")?;
        let (ranges, _) = rest.split_once(" @@")?;
        let (old, new) = ranges.split_once(" +")?;
        let (old_start, old_len) = parse_range(old)?;
        let (new_start, new_len) = parse_range(new)?;
        Some(Self {
            old_start,
            old_len,
            new_start,
            new_len,
        })
    }
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// One hunk: its `@@` marker line and the body lines that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub marker: String,
    pub lines: Vec<String>,
}

impl Hunk {
    /// Changed lines (`+`/`-`) with the leading tag removed.
    pub fn changed_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.starts_with('+') || l.starts_with('-'))
            .map(|l| &l[1..])
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.marker);
        for line in &self.lines {
            out.push_str(line);
        }
    }
}

/// A line or a hunk within a file section, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionPart {
    Line(String),
    Hunk(Hunk),
}

/// All output belonging to one compared file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSection {
    pub parts: Vec<SectionPart>,
}

impl FileSection {
    pub fn hunks(&self) -> impl Iterator<Item = &Hunk> {
        self.parts.iter().filter_map(|p| match p {
            SectionPart::Hunk(h) => Some(h),
            SectionPart::Line(_) => None,
        })
    }

    pub fn has_hunks(&self) -> bool {
        self.hunks().next().is_some()
    }

    fn has_old_header(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, SectionPart::Line(l) if l.starts_with("---")))
    }

    fn render_into(&self, out: &mut String) {
        for part in &self.parts {
            match part {
                SectionPart::Line(line) => out.push_str(line),
                SectionPart::Hunk(hunk) => hunk.render_into(out),
            }
        }
    }
}

/// A whole unified diff split into file sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchDocument {
    /// Lines before the first file section.
    pub preamble: Vec<String>,
    pub sections: Vec<FileSection>,
}

impl PatchDocument {
    /// Split diff output into sections and hunks.
    ///
    /// Hunk bodies are delimited by the line counts in their `@@` header, so
    /// a removed line whose text starts with `--` stays inside its hunk. When
    /// a header cannot be parsed the body runs until the next `@@`, `diff `
    /// or `---` line.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let mut doc = Self::default();
        let mut current: Option<FileSection> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if line.starts_with("@@") {
                let (hunk, next) = read_hunk(&lines, i);
                current
                    .get_or_insert_with(FileSection::default)
                    .parts
                    .push(SectionPart::Hunk(hunk));
                i = next;
                continue;
            }

            let starts_section = line.starts_with("diff ")
                || (line.starts_with("---")
                    && current
                        .as_ref()
                        .is_none_or(|s| s.has_hunks() || s.has_old_header()));
            if starts_section && let Some(done) = current.take() {
                doc.sections.push(done);
            }

            match current.as_mut() {
                Some(section) => section.parts.push(SectionPart::Line(line.to_string())),
                None if starts_section => {
                    current = Some(FileSection {
                        parts: vec![SectionPart::Line(line.to_string())],
                    })
                }
                None => doc.preamble.push(line.to_string()),
            }
            i += 1;
        }

        if let Some(done) = current {
            doc.sections.push(done);
        }
        doc
    }

    /// Number of hunks across all sections.
    pub fn hunk_count(&self) -> usize {
        self.sections.iter().map(|s| s.hunks().count()).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
        }
        for section in &self.sections {
            section.render_into(&mut out);
        }
        out
    }
}

/// Read the hunk whose marker is at `start`; returns it and the next index.
fn read_hunk(lines: &[&str], start: usize) -> (Hunk, usize) {
    let marker = lines[start].to_string();
    let mut body = Vec::new();
    let mut i = start + 1;

    match HunkHeader::parse(&marker) {
        Some(header) => {
            let mut old_left = header.old_len;
            let mut new_left = header.new_len;
            while i < lines.len() && (old_left > 0 || new_left > 0) {
                let line = lines[i];
                match line.as_bytes().first() {
                    Some(b' ') | Some(b'\n') | Some(b'\r') => {
                        old_left = old_left.saturating_sub(1);
                        new_left = new_left.saturating_sub(1);
                    }
                    Some(b'-') => old_left = old_left.saturating_sub(1),
                    Some(b'+') => new_left = new_left.saturating_sub(1),
                    Some(b'\\') => {}
                    _ => break,
                }
                body.push(line.to_string());
                i += 1;
            }
            // "\ No newline at end of file" trails the final line
            while i < lines.len() && lines[i].starts_with('\\') {
                body.push(lines[i].to_string());
                i += 1;
            }
        }
        None => {
            tracing::debug!(marker = marker.trim_end(), "Unparseable hunk header");
            while i < lines.len() {
                let line = lines[i];
                if line.starts_with("@@") || line.starts_with("diff ") || line.starts_with("---") {
                    break;
                }
                body.push(line.to_string());
                i += 1;
            }
        }
    }

    (Hunk { marker, lines: body }, i)
}
