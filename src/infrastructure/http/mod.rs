pub mod reqwest_http;
