use std::fmt;

/// One `[header]` block of the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    header: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Add the entry only when `value` is set.
    pub fn entry_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.entry(key, v),
            None => self,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.header)?;
        for (key, value) in &self.entries {
            if value.is_empty() {
                writeln!(f, "{} =", key)?;
            } else {
                writeln!(f, "{} = {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Ordered list of sections. Order is fixed by whoever pushes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with exactly this header.
    pub fn section(&self, header: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.header == header)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.sections.iter().map(Section::header).collect()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn section_text() {
        let s = Section::new("inet_http_server")
            .entry("port", "127.0.0.1:9001")
            .entry("username", "")
            .entry_opt("chmod", None::<String>);
        assert_eq!(s.to_string(), "[inet_http_server]\nport = 127.0.0.1:9001\nusername =\n");
        assert_eq!(s.get("port"), Some("127.0.0.1:9001"));
        assert_eq!(s.get("chmod"), None);
    }

    #[test]
    fn document_separates_sections_with_blank_line() {
        let mut doc = Document::new();
        doc.push(Section::new("a").entry("k", "v"));
        doc.push(Section::new("b"));
        assert_eq!(doc.to_string(), "[a]\nk = v\n\n[b]\n");
        assert_eq!(doc.headers(), vec!["a", "b"]);
        assert!(doc.section("b").is_some());
    }
}
