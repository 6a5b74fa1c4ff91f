mod import_flow_tests;
mod utils;
