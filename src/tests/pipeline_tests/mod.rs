mod catalog_flow_tests;
mod seen_flow_tests;
