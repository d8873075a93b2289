//! Search engine query DSL
//!
//! Engine-native vocabulary that compiled resource queries are expressed in:
//! term, terms, range, fuzzy match and boolean clauses, sort clauses, and the
//! search/count request descriptors handed to a transport.

mod query;
mod request;

pub use query::{BoolQuery, Fuzziness, MatchQuery, Occur, QueryNode, RangeBound, RangeQuery, Scalar, TermQuery, TermsQuery};
pub use request::{CountRequest, CountResponse, EncodingError, Hit, Hits, SearchRequest, SearchResponse, SortClause, SortOrder};
