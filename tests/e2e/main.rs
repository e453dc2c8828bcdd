//! End-to-end tests: the real HTTP transport against an in-process storefront.

mod harness;
mod scenarios;
