mod collection_test;
mod collection_negative_test;
mod index_consistency_test;
mod index_test;
mod range_test;
