mod token;

pub use token::CacheError;
pub use token::TOKEN_TTL_SECS;
pub use token::TokenCache;
