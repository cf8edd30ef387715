//! Feed-level tests: decoding realistic feeds and expanding their templates.

mod pipeline;
