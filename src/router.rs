use std::sync::Arc;

use crate::error::ParseError;
use crate::files::FileStore;
use crate::handlers;
use crate::request::{Method, Request};
use crate::response::{Response, Status};


const MODULE: &str = "ROUTER";


/// What a route matches the request target against.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Whole target equal to this path.
    Exact(&'static str),
    /// Target starting with this path; the rest is handed to the handler.
    Prefix(&'static str),
}

impl Pattern {
    /// On a match, the part of the target after the fixed path.
    pub fn matches<'a>(&self, target: &'a [u8]) -> Option<&'a [u8]> {
        match self {
            Pattern::Exact(path) => (target == path.as_bytes()).then_some(&[][..]),
            Pattern::Prefix(prefix) => target.strip_prefix(prefix.as_bytes()),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Pattern::Exact(path) | Pattern::Prefix(path) => path,
        }
    }
}


/// Shared, read-only state handlers may use.
pub struct App {
    pub store: Option<Arc<dyn FileStore>>,
}

impl App {
    pub fn new(store: Option<Arc<dyn FileStore>>) -> App {
        App { store }
    }
}

pub type Handler = fn(&Request, &[u8], &App) -> Response;

pub struct Route {
    pub method: Method,
    pub pattern: Pattern,
    pub name: &'static str,
    pub handler: Handler,
}

/// Routes in priority order. The first whose method and pattern match wins.
/// No entry's path is matched by an earlier entry with the same method, so
/// first match gives the same answer as longest fixed prefix.
pub static ROUTES: &[Route] = &[
    Route { method: Method::Get, pattern: Pattern::Exact("/"), name: "root", handler: handlers::root },
    Route { method: Method::Get, pattern: Pattern::Prefix("/echo/"), name: "echo", handler: handlers::echo },
    Route { method: Method::Get, pattern: Pattern::Exact("/user-agent"), name: "user-agent", handler: handlers::user_agent },
    Route { method: Method::Get, pattern: Pattern::Prefix("/files/"), name: "files-get", handler: handlers::read_file },
    Route { method: Method::Post, pattern: Pattern::Prefix("/files/"), name: "files-post", handler: handlers::write_file },
];


/// Run the first matching route, or answer 404.
pub fn dispatch(req: &Request, app: &App) -> Response {
    dispatch_with(ROUTES, req, app)
}

pub fn dispatch_with(routes: &[Route], req: &Request, app: &App) -> Response {
    for route in routes {
        if route.method != req.method() {
            continue;
        }
        if let Some(rest) = route.pattern.matches(req.target()) {
            debug!("[{}] {} {} matched route `{}` ({})", MODULE, req.method(), req.target_lossy(), route.name, route.pattern.path());
            return (route.handler)(req, rest, app);
        }
    }
    debug!("[{}] No route for {} {}", MODULE, req.method(), req.target_lossy());
    Response::new(Status::NotFound)
}


/// Status a parse failure is reported with. `None` means nothing is sent and
/// the connection is dropped.
pub fn failure_status(err: &ParseError) -> Option<Status> {
    match err {
        ParseError::MalformedRequestLine => Some(Status::NotFound),
        ParseError::UnknownMethod(_) => Some(Status::NotImplemented),
        ParseError::UnsupportedVersion(_) => Some(Status::HttpVersionNotSupported),
        ParseError::MissingHostHeader | ParseError::DuplicateHostHeader => Some(Status::BadRequest),
        ParseError::MalformedTarget(_) => Some(Status::BadRequest),
        ParseError::UnsupportedTransferEncoding => Some(Status::NotImplemented),
        ParseError::MalformedContentLength(_) => Some(Status::BadRequest),
        ParseError::TruncatedBody(_) => Some(Status::InternalServerError),
        ParseError::Stream(_) => None,
    }
}

pub fn failure_response(err: &ParseError) -> Option<Response> {
    failure_status(err).map(Response::new)
}


#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::reader::LineReader;

    fn request(input: &str) -> Request {
        let mut reader = LineReader::new(Cursor::new(input.as_bytes().to_vec()));
        Request::parse(&mut reader).unwrap()
    }

    fn get(target: &str) -> Request {
        request(&format!("GET {} HTTP/1.1\r\nHost: x\r\n\r\n", target))
    }

    fn marker(_: &Request, rest: &[u8], _: &App) -> Response {
        Response::new(Status::Ok).with_body(rest.to_vec())
    }

    fn other(_: &Request, _: &[u8], _: &App) -> Response {
        Response::new(Status::Created)
    }

    #[test]
    fn patterns() {
        assert_eq!(Pattern::Exact("/").matches(b"/"), Some(&b""[..]));
        assert_eq!(Pattern::Exact("/").matches(b"/x"), None);
        assert_eq!(Pattern::Prefix("/echo/").matches(b"/echo/abc"), Some(&b"abc"[..]));
        assert_eq!(Pattern::Prefix("/echo/").matches(b"/echo/"), Some(&b""[..]));
        assert_eq!(Pattern::Prefix("/echo/").matches(b"/echo"), None);
        assert_eq!(Pattern::Prefix("/echo/").matches(b"/echo/\xff"), Some(&b"\xff"[..]));
    }

    #[test]
    fn no_route_shadows_a_later_one() {
        for (i, later) in ROUTES.iter().enumerate() {
            for earlier in &ROUTES[..i] {
                if earlier.method != later.method {
                    continue;
                }
                assert!(
                    earlier.pattern.matches(later.pattern.path().as_bytes()).is_none(),
                    "route `{}` hides `{}`", earlier.name, later.name
                );
            }
        }
    }

    #[test]
    fn first_match_wins() {
        let routes = [
            Route { method: Method::Get, pattern: Pattern::Prefix("/a/"), name: "a", handler: marker },
            Route { method: Method::Get, pattern: Pattern::Prefix("/a/b"), name: "ab", handler: other },
        ];
        let app = App::new(None);
        let res = dispatch_with(&routes, &get("/a/bc"), &app);
        assert_eq!(res.status(), Status::Ok);
        assert_eq!(res.body(), b"bc");
    }

    #[test]
    fn method_must_match() {
        let routes = [
            Route { method: Method::Post, pattern: Pattern::Exact("/"), name: "post", handler: other },
        ];
        let app = App::new(None);
        assert_eq!(dispatch_with(&routes, &get("/"), &app).status(), Status::NotFound);
    }

    #[test]
    fn unknown_target_is_404() {
        let app = App::new(None);
        assert_eq!(dispatch(&get("/nope"), &app).status(), Status::NotFound);
        assert_eq!(dispatch(&get("/echo"), &app).status(), Status::NotFound);
        assert_eq!(dispatch(&request("PUT / HTTP/1.1\r\nHost: x\r\n\r\n"), &app).status(), Status::NotFound);
    }

    #[test]
    fn root() {
        let app = App::new(None);
        let res = dispatch(&get("/"), &app);
        assert_eq!(res.status(), Status::Ok);
        assert!(res.headers().is_empty());
        assert!(res.body().is_empty());
    }

    #[test]
    fn failure_table() {
        let eof = || io::Error::from(io::ErrorKind::UnexpectedEof);
        let cases = [
            (ParseError::MalformedRequestLine, Some(404)),
            (ParseError::UnknownMethod("FOO".into()), Some(501)),
            (ParseError::UnsupportedVersion("HTTP/1.0".into()), Some(505)),
            (ParseError::MissingHostHeader, Some(400)),
            (ParseError::DuplicateHostHeader, Some(400)),
            (ParseError::MalformedTarget("x".into()), Some(400)),
            (ParseError::UnsupportedTransferEncoding, Some(501)),
            (ParseError::MalformedContentLength("x".into()), Some(400)),
            (ParseError::TruncatedBody(eof()), Some(500)),
            (ParseError::Stream(eof()), None),
        ];
        for (err, expected) in cases {
            assert_eq!(failure_status(&err).map(|s| s.code()), expected, "{}", err);
        }
    }

    #[test]
    fn failure_response_has_no_body() {
        let res = failure_response(&ParseError::DuplicateHostHeader).unwrap();
        assert_eq!(res.to_bytes("HTTP/1.1"), b"HTTP/1.1 400 Bad Request\r\n\r\n");
        assert!(failure_response(&ParseError::Stream(io::Error::from(io::ErrorKind::BrokenPipe))).is_none());
    }
}
