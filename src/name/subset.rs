use super::*;

impl Name {
    /// Keep only the Unicode records of the most basic names (copyright,
    /// family, subfamily, identifier, full name, version and PostScript
    /// name). If the font has none of those, everything is kept.
    pub fn subset(&self) -> Self {
        let records: Vec<NameRecord> = self
            .records
            .iter()
            .filter(|record| record.is_unicode() && record.name_id <= 6)
            .cloned()
            .collect();

        if records.is_empty() {
            return self.clone();
        }

        Self { version: self.version, records, lang_tags: self.lang_tags.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform_id: u16, encoding_id: u16, name_id: u16) -> NameRecord {
        NameRecord { platform_id, encoding_id, language_id: 0, name_id, string: vec![0, 65] }
    }

    #[test]
    fn keeps_unicode_records_of_basic_names() {
        let table = Name {
            version: 0,
            records: vec![record(1, 0, 1), record(3, 1, 1), record(3, 1, 13), record(0, 3, 6)],
            lang_tags: vec![],
        };
        assert_eq!(table.subset().records, vec![record(3, 1, 1), record(0, 3, 6)]);
    }

    #[test]
    fn falls_back_to_all_records() {
        let table = Name { version: 0, records: vec![record(1, 0, 1)], lang_tags: vec![] };
        assert_eq!(table.subset(), table);
    }
}
