// Text processing — tokenization, stopwords and the per-term position index.

pub mod index;
pub mod stopwords;
pub mod tokenizer;

pub use index::{OrStem, TermIndex, TermLabels, Unstem};
pub use stopwords::Stopwords;
pub use tokenizer::{strip_tags, Token, Tokenizer};
