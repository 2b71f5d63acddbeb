/// Counters from one pipeline run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub queries_run: u32,
    pub raw_results: u32,
    pub duplicates_skipped: u32,
    pub pre_filtered: u32,
    pub model_extracted: u32,
    pub heuristic_extracted: u32,
    pub post_filtered: u32,
    pub records_returned: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Scout Run Complete ===")?;
        writeln!(f, "Queries run:         {}", self.queries_run)?;
        writeln!(f, "Raw results:         {}", self.raw_results)?;
        writeln!(f, "Duplicates skipped:  {}", self.duplicates_skipped)?;
        writeln!(f, "Dropped as past:     {}", self.pre_filtered)?;
        writeln!(f, "Model extracted:     {}", self.model_extracted)?;
        writeln!(f, "Heuristic extracted: {}", self.heuristic_extracted)?;
        writeln!(f, "Dropped after dates: {}", self.post_filtered)?;
        writeln!(f, "Records returned:    {}", self.records_returned)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_every_counter() {
        let stats = RunStats {
            queries_run: 2,
            raw_results: 16,
            duplicates_skipped: 3,
            pre_filtered: 4,
            model_extracted: 7,
            heuristic_extracted: 2,
            post_filtered: 1,
            records_returned: 8,
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Queries run:         2"));
        assert!(rendered.contains("Duplicates skipped:  3"));
        assert!(rendered.contains("Heuristic extracted: 2"));
        assert!(rendered.contains("Records returned:    8"));
    }
}
