//! Integration tests against an in-process stub of the library API

mod edit_page;
mod http_client;
