//! Integration tests for partner-crawl

mod crawl_tests;
