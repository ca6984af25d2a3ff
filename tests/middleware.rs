use bytes::Bytes;
use http::{Method, StatusCode};
use notekit::middleware::{ContentLength, Stack, Trace, Transform, UPPER_PREFIX};
use notekit::{Body, Captured, Environ, Error, Handler, Headers, ResponseReceiver, StatusLine};

fn declared(_env: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
    start.start(StatusLine::from(StatusCode::OK), vec![
        ("Server".into(), "notekit".into()),
        ("Content-Length".into(), "9".into()),
        ("Cache-Control".into(), "no-store".into()),
        ("Content-Type".into(), "text/plain".into()),
    ]);
    Ok(vec![Bytes::from_static(b"abc"), Bytes::from_static(b"def"), Bytes::from_static(b"ghi")])
}

fn run(handler: &impl Handler, method: Method) -> notekit::Response {
    let mut captured = Captured::new();
    let body = handler.call(&Environ::new(method, "/"), &mut captured).unwrap();
    captured.into_response(body).unwrap()
}

#[test]
fn length_grows_by_exactly_the_prefix() {
    let res = run(&Transform::upper(declared), Method::GET);

    assert_eq!(
        res.header("content-length"),
        Some((9 + UPPER_PREFIX.len()).to_string().as_str()),
    );
    assert_eq!(res.body(), format!("{UPPER_PREFIX}ABCDEFGHI"));
    assert_eq!(res.body().len(), 9 + UPPER_PREFIX.len());
}

#[test]
fn header_order_and_count_are_preserved() {
    let res = run(&Transform::upper(declared), Method::GET);

    let names: Vec<&str> = res.headers().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["Server", "Content-Length", "Cache-Control", "Content-Type"]);
    assert_eq!(res.header("cache-control"), Some("no-store"));
}

#[test]
fn prefix_is_not_uppercased() {
    let res = run(&Transform::upper(declared), Method::GET);
    assert!(res.body().starts_with(b"Upper middleware:<br/>"));
}

#[test]
fn custom_prefix_and_mapping() {
    fn reverse(chunk: &[u8]) -> Bytes {
        chunk.iter().rev().copied().collect::<Vec<_>>().into()
    }

    let res = run(&Transform::new(declared).prefix(">> ").map_chunks(reverse), Method::GET);
    assert_eq!(res.body(), ">> cbafedihg");
    assert_eq!(res.header("content-length"), Some("12"));
}

#[test]
fn recompute_matches_the_wire_body() {
    fn lying(_env: &Environ, start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        start.start(StatusLine::from(StatusCode::OK), vec![("Content-Length".into(), "1000".into())]);
        Ok(vec![Bytes::from_static(b"short")])
    }

    let res = run(
        &Transform::upper(lying).content_length(ContentLength::Recompute),
        Method::GET,
    );
    assert_eq!(res.header("content-length"), Some(res.body().len().to_string().as_str()));
}

#[test]
fn forgotten_start_is_invalid_state() {
    fn forgetful(_env: &Environ, _start: &mut dyn ResponseReceiver) -> Result<Body, Error> {
        Ok(vec![Bytes::from_static(b"oops")])
    }

    struct Refuse;
    impl ResponseReceiver for Refuse {
        fn start(&mut self, _: StatusLine, _: Headers) {
            panic!("must not be forwarded");
        }
    }

    let err = Transform::upper(forgetful)
        .call(&Environ::new(Method::GET, "/"), &mut Refuse)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState));
}

#[test]
fn one_transform_serves_concurrent_requests() {
    let app = Stack::new(notekit::app::request_method)
        .wrap(Transform::upper)
        .wrap(Trace::new)
        .boxed();

    let methods = [Method::GET, Method::POST, Method::PATCH, Method::OPTIONS];
    let handles: Vec<_> = methods.iter().cloned()
        .map(|method| {
            let app = app.clone();
            std::thread::spawn(move || {
                let res = run(&app, method.clone());
                (method, res.body(), res.header("content-length").map(str::to_owned))
            })
        })
        .collect();

    for handle in handles {
        let (method, body, length) = handle.join().unwrap();
        let expected = format!("{UPPER_PREFIX}REQUEST METHOD: {method}");
        assert_eq!(body, expected);
        assert_eq!(length, Some(expected.len().to_string()));
    }
}
