use std::net::SocketAddr;

use crate::utils::{generate_hex_id, time_us};


const QID_LENGTH: u32 = 8;


/// Bookkeeping for one accepted connection.
pub struct Context {
    pub qid: String,
    pub peer: Option<SocketAddr>,
    pub start_time_us: u128,
    pub finish_time_us: u128,
}

impl Context {
    pub fn new(peer: Option<SocketAddr>) -> Context {
        Context {
            qid: generate_hex_id(QID_LENGTH),
            peer,
            start_time_us: time_us(),
            finish_time_us: 0,
        }
    }

    pub fn fix(&mut self) {
        self.finish_time_us = time_us();
    }

    pub fn time_ms(&self) -> f32 {
        (self.finish_time_us.saturating_sub(self.start_time_us) as f32) / 1000.0
    }

    pub fn peer_str(&self) -> String {
        self.peer.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing() {
        let mut ctx = Context::new(None);
        assert_eq!(ctx.qid.len(), QID_LENGTH as usize);
        assert_eq!(ctx.time_ms(), 0.0);
        ctx.fix();
        assert!(ctx.time_ms() >= 0.0);
        assert_eq!(ctx.peer_str(), "-");
    }

    #[test]
    fn peer_shown() {
        let ctx = Context::new(Some("127.0.0.1:4221".parse().unwrap()));
        assert_eq!(ctx.peer_str(), "127.0.0.1:4221");
    }
}
