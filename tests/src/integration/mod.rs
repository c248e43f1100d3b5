//! End-to-end pipeline tests over the in-memory broker.

#[cfg(test)]
mod request_response;
