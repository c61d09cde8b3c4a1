//! Parameter bundles for the richer operations.
//!
//! Plain structs with defaults. An empty database name means the
//! connection's current database.

/// Parameters for record search.
#[derive(Debug, Clone)]
pub struct SearchParameters {
    /// Database to search, the current one when empty.
    pub database: String,
    /// Index of the first record wanted, 1-based.
    pub first_record: u32,
    /// Format applied to the found records, empty for none.
    pub format: String,
    /// Upper MFN bound, 0 for none.
    pub max_mfn: u32,
    /// Lower MFN bound, 0 for none.
    pub min_mfn: u32,
    /// Total number of records wanted, 0 for all.
    pub number_of_records: u32,
    /// Dictionary search expression.
    pub expression: String,
    /// Sequential search expression, empty for none.
    pub sequential: String,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            database: String::new(),
            first_record: 1,
            format: String::new(),
            max_mfn: 0,
            min_mfn: 0,
            number_of_records: 0,
            expression: String::new(),
            sequential: String::new(),
        }
    }
}

impl SearchParameters {
    /// Parameters for a plain dictionary search.
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }
}

/// Parameters for dictionary term listing.
#[derive(Debug, Clone, Default)]
pub struct TermParameters {
    /// Database holding the dictionary, the current one when empty.
    pub database: String,
    /// Number of terms wanted.
    pub number_of_terms: u32,
    /// List terms preceding the start term instead of following it.
    pub reverse_order: bool,
    /// Term the listing starts at.
    pub start_term: String,
    /// Format applied to each term, empty for none.
    pub format: String,
}

/// Parameters for posting retrieval.
#[derive(Debug, Clone)]
pub struct PostingParameters {
    /// Database holding the index, the current one when empty.
    pub database: String,
    /// Index of the first posting wanted, 1-based.
    pub first_posting: u32,
    /// Format applied to each posting, empty for none.
    pub format: String,
    /// Number of postings wanted, 0 for all.
    pub number_of_postings: u32,
    /// The term whose postings are wanted.
    pub term: String,
    /// When non-empty, postings for each listed term instead.
    pub list_of_terms: Vec<String>,
}

impl Default for PostingParameters {
    fn default() -> Self {
        Self {
            database: String::new(),
            first_posting: 1,
            format: String::new(),
            number_of_postings: 0,
            term: String::new(),
            list_of_terms: Vec::new(),
        }
    }
}

/// Definition of a table to be laid out by the server.
#[derive(Debug, Clone, Default)]
pub struct TableDefinition {
    /// Database the table draws from, the current one when empty.
    pub database: String,
    /// Table file name.
    pub table: String,
    /// Formatting mode.
    pub mode: String,
    /// Dictionary query selecting the records.
    pub search_query: String,
    /// Lower MFN bound, 0 for none.
    pub min_mfn: u32,
    /// Upper MFN bound, 0 for none.
    pub max_mfn: u32,
    /// Sequential query applied after the dictionary query.
    pub sequential_query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let params = SearchParameters::default();
        assert_eq!(params.first_record, 1);
        assert_eq!(params.number_of_records, 0);
    }

    #[test]
    fn test_search_expression_shorthand() {
        let params = SearchParameters::expression("K=BYTE");
        assert_eq!(params.expression, "K=BYTE");
        assert_eq!(params.first_record, 1);
    }

    #[test]
    fn test_posting_defaults() {
        let params = PostingParameters::default();
        assert_eq!(params.first_posting, 1);
        assert!(params.list_of_terms.is_empty());
    }
}
