mod common;

mod generate_api_test;
mod system_api_test;
