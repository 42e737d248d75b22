#![allow(dead_code)]

pub mod config;
pub mod mock_stt;

/// 16 kHz mono 16-bit PCM of the given length in seconds, all zero
pub fn silent_pcm(seconds: usize) -> Vec<u8> {
    vec![0; seconds * 32_000]
}

/// Address nothing is listening on
pub async fn closed_port_url(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{path}")
}
