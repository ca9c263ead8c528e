//! Transport adapters
//!
//! Binds endpoints to a wire protocol. Only HTTP is provided.

pub mod http;

pub use http::{
    decode_problem_request, decode_problems_request, encode_problem_response,
    encode_problems_response, error_response, json_response, HttpHandler, HttpTransport,
    PathParams, JSON_CONTENT_TYPE, PROBLEM_ID_PARAM,
};
