mod query_test;
mod query_negative_test;
