//! インテグレーションテスト

use pathwright::{
    url, Application, Error, ErrorHandler, Extension, Handler, HttpError, Method, Request, Response,
};

// 拡張機能: アプリとリクエストに属性を付与する
struct ExtensionA;

impl Extension for ExtensionA {
    fn setup(&self, app: &mut Application) {
        app.attributes_mut().set("one", 1i32);
    }

    fn before(&self, req: &mut Request) -> Result<(), Error> {
        req.attributes_mut().set("two", 2i32);
        Ok(())
    }

    fn after(&self, req: &mut Request, _res: &mut Response) -> Result<(), Error> {
        req.attributes_mut().set("three", 3i32);
        Ok(())
    }
}

fn root_handler() -> Handler {
    url("/")
        .get(|_req, _args| Ok(Response::html("get")))
        .post(|_req, _args| Ok(Response::html("post")))
        .build()
        .unwrap()
}

fn arg_handler() -> Handler {
    url("/arg/_/")
        .get(|_req, args| Ok(format!("get {}", args[0])))
        .post(|_req, args| Ok(format!("post {}", args[0])))
        .build()
        .unwrap()
}

fn division_by_zero_handler() -> Handler {
    url("/error/")
        .get(|_req, _args| -> Result<String, Error> {
            let zero = "0".parse::<i32>().map_err(|e| Error::Handler(e.to_string()))?;
            Ok(format!("{}", 1 / zero))
        })
        .build()
        .unwrap()
}

fn failing_handler() -> Handler {
    url("/fail/")
        .get(|_req, _args| -> Result<String, Error> { Err(Error::Handler("secret detail".to_string())) })
        .build()
        .unwrap()
}

fn fire_police() -> ErrorHandler {
    ErrorHandler::new()
        .on_status(404, |e| Response::html("404").status(e.status()))
        .on_class(5, |e| Response::html("5xx").status(e.status()))
}

fn app(debug: bool) -> Application {
    let mut app = Application::builder()
        .debug(debug)
        .error_handler(fire_police())
        .extension(ExtensionA)
        .build();
    app.add_handler(root_handler());
    app.add_handler(arg_handler());
    app.add_handler(division_by_zero_handler());
    app.add_handler(failing_handler());
    app
}

fn handle(app: &Application, mut req: Request) -> Response {
    app.handle_request(&mut req)
}

#[test]
fn test_extension() {
    let app = app(false);
    assert_eq!(app.attributes().get::<i32>("one"), Some(&1));

    let mut request = Request::get("/");
    let response = app.handle_request(&mut request);
    assert_eq!(response.text(), "get");
    assert_eq!(request.attributes().get::<i32>("two"), Some(&2));
    assert_eq!(request.attributes().get::<i32>("three"), Some(&3));
}

#[test]
fn test_get() {
    let app = app(false);
    assert_eq!(handle(&app, Request::get("/")).text(), "get");
    assert_eq!(handle(&app, Request::get("/arg/gold/")).text(), "get gold");
}

#[test]
fn test_post() {
    let app = app(false);
    assert_eq!(handle(&app, Request::post("/")).text(), "post");
    assert_eq!(handle(&app, Request::post("/arg/gold/")).text(), "post gold");
}

#[test]
fn test_head() {
    let app = app(false);
    let get = handle(&app, Request::get("/arg/gold/"));
    let head = handle(&app, Request::head("/arg/gold/"));

    assert_eq!(head.status_line(), get.status_line());
    assert_eq!(head.headerlist, get.headerlist);
    assert_eq!(head.content_type_header(), get.content_type_header());
    assert!(head.body.is_empty());
}

#[test]
fn test_redirect() {
    let app = app(false);

    let response = handle(&app, Request::get(""));
    assert_eq!(response.status_line(), "302 Found");
    assert_eq!(response.header("Location"), Some("/"));

    let response = handle(&app, Request::get("/arg/gold"));
    assert_eq!(response.status_line(), "302 Found");
    assert_eq!(response.header("Location"), Some("/arg/gold/"));
}

#[test]
fn test_permanent_redirect() {
    let app = Application::builder()
        .permanent_redirect(true)
        .handler(arg_handler())
        .build();

    let response = handle(&app, Request::get("/arg/gold"));
    assert_eq!(response.status_line(), "301 Moved Permanently");
    assert_eq!(response.header("Location"), Some("/arg/gold/"));
}

#[test]
fn test_not_found() {
    let app = app(false);
    let response = handle(&app, Request::get("/gold/"));
    assert_eq!(response.text(), "404");
    assert_eq!(response.status_line(), "404 Not Found");
}

#[test]
fn test_internal_server_error() {
    let app = app(false);
    let response = handle(&app, Request::get("/error/"));
    assert_eq!(response.text(), "5xx");
    assert_eq!(response.status_line(), "500 Internal Server Error");
}

#[test]
fn test_error_detail_not_leaked() {
    for debug in [false, true] {
        let app = app(debug);
        let response = handle(&app, Request::get("/fail/"));
        assert_eq!(response.status, 500);
        assert!(!response.text().contains("secret detail"));
    }
}

#[test]
fn test_panic_becomes_internal_server_error() {
    let app = Application::builder()
        .handler(
            url("/panic/")
                .get(|_req, _args| -> Result<String, Error> { panic!("Test panic from handler") })
                .build()
                .unwrap(),
        )
        .build();

    let response = handle(&app, Request::get("/panic/"));
    assert_eq!(response.status, 500);
    assert_eq!(response.text(), "Error 500");
}

#[test]
fn test_method_not_allowed() {
    let app = app(false);
    let response = handle(&app, Request::put("/"));
    assert_eq!(response.text(), "Error 405");
    assert_eq!(response.status_line(), "405 Method Not Allowed");

    let response = handle(&app, Request::delete("/"));
    assert_eq!(response.status, 405);
}

#[test]
fn test_unknown_verb_routes_like_any_other() {
    let app = Application::builder()
        .error_handler(ErrorHandler::new().on_class(4, |e| Response::html("custom 4xx").status(e.status())))
        .handler(root_handler())
        .build();

    let response = handle(&app, Request::new(Method::parse("TRACE"), "/no/such/route/"));
    assert_eq!(response.status, 404);
    assert_eq!(response.text(), "custom 4xx");

    let response = handle(&app, Request::new(Method::parse("TRACE"), "/"));
    assert_eq!(response.status, 405);
    assert_eq!(response.text(), "custom 4xx");
}

#[test]
fn test_respond_error_uses_error_handler() {
    let app = Application::builder()
        .error_handler(ErrorHandler::new().on_status(413, |e| Response::html("too big").status(e.status())))
        .build();

    let response = app.respond_error(&Request::post("/upload/"), HttpError::payload_too_large());
    assert_eq!(response.status_line(), "413 Payload Too Large");
    assert_eq!(response.text(), "too big");

    let response = app.respond_error(&Request::get("/"), HttpError::new(429));
    assert_eq!(response.text(), "Error 429");
}

#[test]
fn test_custom_http_error_status_preserved() {
    let app = Application::builder()
        .error_handler(fire_police())
        .handler(
            url("/teapot/")
                .get(|_req, _args| -> Result<String, Error> { Err(HttpError::new(418).into()) })
                .post(|_req, _args| -> Result<String, Error> { Err(HttpError::new(503).into()) })
                .build()
                .unwrap(),
        )
        .build();

    let response = handle(&app, Request::get("/teapot/"));
    assert_eq!(response.status, 418);
    assert_eq!(response.text(), "Error 418");

    let response = handle(&app, Request::post("/teapot/"));
    assert_eq!(response.status, 503);
    assert_eq!(response.text(), "5xx");
}

#[test]
fn test_metal_food_scenario() {
    let app = Application::builder()
        .handler(
            url("/metal/_/food/_/")
                .get(|_req, args| Ok(args.join(",")))
                .build()
                .unwrap(),
        )
        .build();

    let response = handle(&app, Request::get("/metal/silver/food/apple/"));
    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "silver,apple");

    let response = handle(&app, Request::get("/metal/silver/food/apple"));
    assert_eq!(response.status, 302);
    assert_eq!(response.header("Location"), Some("/metal/silver/food/apple/"));
}

#[test]
fn test_first_registered_pattern_wins() {
    let specific = url("/items/new/").get(|_req, _args| Ok("specific")).build().unwrap();
    let generic = url("/items/_/").get(|_req, _args| Ok("generic")).build().unwrap();

    let app = Application::builder()
        .handler(generic)
        .handler(specific)
        .build();
    assert_eq!(handle(&app, Request::get("/items/new/")).text(), "generic");

    let specific = url("/items/new/").get(|_req, _args| Ok("specific")).build().unwrap();
    let generic = url("/items/_/").get(|_req, _args| Ok("generic")).build().unwrap();
    let app = Application::builder()
        .handler(specific)
        .handler(generic)
        .build();
    assert_eq!(handle(&app, Request::get("/items/new/")).text(), "specific");
    assert_eq!(handle(&app, Request::get("/items/old/")).text(), "generic");
}

#[test]
fn test_reregistering_pattern_overwrites_in_place() {
    let mut app = Application::builder()
        .handler(url("/a/").get(|_req, _args| Ok("first a")).build().unwrap())
        .handler(url("/_/").get(|_req, _args| Ok("wildcard")).build().unwrap())
        .build();

    app.add_handler(url("/a/").get(|_req, _args| Ok("second a")).build().unwrap());

    assert_eq!(app.routes().collect::<Vec<_>>(), vec!["/a/", "/_/"]);
    assert_eq!(handle(&app, Request::get("/a/")).text(), "second a");
}

#[test]
fn test_find_handler() {
    let app = app(false);
    let (handler, captures) = app.find_handler("/arg/gold/").unwrap();
    assert_eq!(handler.pattern().template(), "/arg/_/");
    assert_eq!(captures, vec!["gold".to_string()]);
    assert!(handler.supports(&Method::HEAD));
    assert!(app.find_handler("/arg/gold").is_none());
}

#[test]
fn test_application_is_shareable_across_threads() {
    let app = std::sync::Arc::new(app(false));
    let workers: Vec<_> = (0..4)
        .map(|i| {
            let app = app.clone();
            std::thread::spawn(move || {
                let mut req = Request::get(format!("/arg/{}/", i));
                app.handle_request(&mut req).text()
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        assert_eq!(worker.join().unwrap(), format!("get {}", i));
    }
}
