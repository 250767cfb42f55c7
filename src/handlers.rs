use std::str;

use crate::encoding;
use crate::error::StoreError;
use crate::request::{Request, HEADER_ACCEPT_ENCODING, HEADER_USER_AGENT};
use crate::response::{Response, Status, CONTENT_ENCODING, OCTET_STREAM, TEXT_PLAIN};
use crate::router::App;


const MODULE: &str = "HANDLERS";


pub fn root(_req: &Request, _rest: &[u8], _app: &App) -> Response {
    Response::new(Status::Ok)
}

/// Send back the rest of the target, gzipped if the client accepts it.
pub fn echo(req: &Request, rest: &[u8], _app: &App) -> Response {
    let body = rest.to_vec();
    let accept = req.header(HEADER_ACCEPT_ENCODING).and_then(|v| str::from_utf8(v).ok());
    let Some(enc) = accept.and_then(encoding::negotiate) else {
        return Response::new(Status::Ok).with_content(TEXT_PLAIN, body);
    };

    match enc.encode(&body) {
        Ok(packed) => Response::new(Status::Ok)
            .with_header(CONTENT_ENCODING, enc.as_str())
            .with_content(TEXT_PLAIN, packed),
        Err(e) => {
            error!("[{}] Failed to {} echo body: {}", MODULE, enc.as_str(), e);
            Response::new(Status::InternalServerError)
        }
    }
}

pub fn user_agent(req: &Request, _rest: &[u8], _app: &App) -> Response {
    let agent = req.header(HEADER_USER_AGENT).unwrap_or_default();
    Response::new(Status::Ok).with_content(TEXT_PLAIN, agent.to_vec())
}

/// File names must be UTF-8; anything else cannot name a stored file.
fn file_name(raw: &[u8]) -> Option<&str> {
    str::from_utf8(raw).ok()
}

pub fn read_file(_req: &Request, name: &[u8], app: &App) -> Response {
    let (Some(store), Some(name)) = (&app.store, file_name(name)) else {
        return Response::new(Status::NotFound);
    };
    match store.read(name) {
        Ok(data) => Response::new(Status::Ok).with_content(OCTET_STREAM, data),
        Err(StoreError::NotFound) => Response::new(Status::NotFound),
        Err(e) => {
            error!("[{}] Failed to read file `{}`: {}", MODULE, name, e);
            Response::new(Status::InternalServerError)
        }
    }
}

pub fn write_file(req: &Request, name: &[u8], app: &App) -> Response {
    let (Some(store), Some(name)) = (&app.store, file_name(name)) else {
        return Response::new(Status::NotFound);
    };
    match store.write(name, req.body()) {
        Ok(()) => {
            info!("[{}] Stored {} bytes as `{}`", MODULE, req.body().len(), name);
            Response::new(Status::Created)
        }
        Err(StoreError::NotFound) => Response::new(Status::NotFound),
        Err(e) => {
            error!("[{}] Failed to write file `{}`: {}", MODULE, name, e);
            Response::new(Status::InternalServerError)
        }
    }
}
