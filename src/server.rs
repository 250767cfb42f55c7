use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;

use crate::context::Context;
use crate::reader::LineReader;
use crate::request::Request;
use crate::response::{Response, Status, HTTP_VERSION};
use crate::router::{dispatch, failure_response, App};


const MODULE: &str = "SERVER";


/// Read one request from `input`, answer it on `output`, then stop.
///
/// Returns the status that was sent. A transport failure, including a peer
/// that hangs up before the request is complete, comes back as `Err` and
/// nothing is written.
pub fn serve<R: Read, W: Write>(input: R, output: W, app: &App, ctx: &mut Context) -> io::Result<Status> {
    let mut reader = LineReader::new(BufReader::new(input));

    let response = match Request::parse(&mut reader) {
        Ok(req) => {
            info!(
                "New Request [qid={}]: peer: {}; method: {}; target: {}; headers: {}; body: {} bytes",
                ctx.qid, ctx.peer_str(), req.method(), req.target_lossy(), req.headers().len(), req.body().len()
            );
            dispatch(&req, app)
        }
        Err(e) => match failure_response(&e) {
            Some(res) => {
                warn!("[{}] Rejected request [qid={}] from {}: {}", MODULE, ctx.qid, ctx.peer_str(), e);
                res
            }
            // stream failure, the peer gets nothing
            None => return Err(e.into()),
        },
    };

    respond(output, &response, ctx)
}

fn respond<W: Write>(output: W, response: &Response, ctx: &mut Context) -> io::Result<Status> {
    let mut w = BufWriter::new(output);
    let sent = response.write_to(HTTP_VERSION, &mut w)?;
    w.flush()?;

    ctx.fix();
    info!(
        "Respond to [{}]: time: {}ms; status: {}; sent: {} bytes",
        ctx.qid, ctx.time_ms(), response.status().code(), sent
    );
    Ok(response.status())
}

/// Serve a single accepted TCP connection and close it.
pub fn handle_connection(stream: TcpStream, app: &App) {
    let mut ctx = Context::new(stream.peer_addr().ok());
    if let Err(e) = serve(&stream, &stream, app, &mut ctx) {
        error!("[{}] Connection [qid={}] from {} dropped: {}", MODULE, ctx.qid, ctx.peer_str(), e);
    }
    // dropping the stream closes it
}
