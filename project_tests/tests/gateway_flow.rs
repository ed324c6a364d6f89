//! End-to-end loads through the public API of `lib_facts`, against a local
//! one-shot HTTP server and an in-memory cache.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use lib_facts::connections::MemoryFactStore;
use lib_facts::{
    ApiVersion, CacheDataSource, DeliveryContext, ErrorKind, FactItem, FactListModel, FactsConfig, FactsGateway,
    GatewayConfiguration, LoadFactsUseCase, LoggerLocal, NetworkRequestExecutor, RemoteDataSource, Source,
};

fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("no connection");
        let mut buf = [0u8; 2048];
        let read = stream.read(&mut buf).unwrap_or(0);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&buf[..read]).to_string()
    });

    (format!("http://127.0.0.1:{}/api", port), handle)
}

fn serve_keep_alive(body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || {
                let mut buf = [0u8; 2048];
                while let Ok(read) = stream.read(&mut buf) {
                    if read == 0 {
                        break;
                    }
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/json\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    if stream.write_all(response.as_bytes()).is_err() {
                        break;
                    }
                }
            });
        }
    });

    (format!("http://127.0.0.1:{}/api", port), accepted)
}

fn gateway(base_url: &str) -> FactsGateway {
    let logger = Arc::new(LoggerLocal::silent("gateway_flow"));
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let executor = NetworkRequestExecutor::with_client(client, base_url, ApiVersion::V1, logger.clone());
    let remote = RemoteDataSource::new(executor, logger.clone());
    let cache = CacheDataSource::new(Arc::new(MemoryFactStore::new()), logger.clone());
    FactsGateway::new(remote, cache, logger)
}

#[tokio::test]
async fn write_through_fills_the_cache() {
    let (base_url, server) = serve_once("200 OK", r#"[{"fact":"A"},{"fact":"B"},{"fact":"C"}]"#);
    let gateway = gateway(&base_url);

    let fetched = gateway.load(GatewayConfiguration::remote(3, true)).await.unwrap();
    let request_text = server.join().unwrap();

    assert!(request_text.starts_with("GET /api/v1/resources/dogs?number=3 HTTP/1.1"));
    let texts: Vec<&str> = fetched.iter().map(|f| f.text()).collect();
    assert_eq!(texts, vec!["A", "B", "C"]);

    let cached = gateway.load(GatewayConfiguration::cache(2)).await.unwrap();
    assert_eq!(cached, fetched[..2].to_vec());
}

#[tokio::test]
async fn remote_without_write_through_leaves_cache_empty() {
    let (base_url, server) = serve_once("200 OK", r#"[{"fact":"A"}]"#);
    let gateway = gateway(&base_url);

    assert_eq!(gateway.load(GatewayConfiguration::remote(1, false)).await.unwrap().len(), 1);
    server.join().unwrap();

    assert!(gateway.load(GatewayConfiguration::cache(20)).await.unwrap().is_empty());
}

#[tokio::test]
async fn server_error_is_classified_and_nothing_is_cached() {
    let (base_url, server) = serve_once("500 Internal Server Error", "oops");
    let gateway = gateway(&base_url);

    let error = gateway.load(GatewayConfiguration::remote(2, true)).await.unwrap_err();
    server.join().unwrap();

    assert!(error.is(ErrorKind::InvalidStatusCode));
    assert_eq!(error.domain, "NetworkLayer");
    assert_eq!(error.code, -3);
    assert!(gateway.load(GatewayConfiguration::cache(20)).await.unwrap().is_empty());
}

#[tokio::test]
async fn fact_list_shows_loaded_facts() {
    let (base_url, server) = serve_once("200 OK", r#"[{"fact":"Dogs sweat through their paws."}]"#);
    let logger = Arc::new(LoggerLocal::silent("fact_list_flow"));
    let context = DeliveryContext::spawn(logger.clone());
    let use_case = LoadFactsUseCase::new(Arc::new(gateway(&base_url)), logger.clone())
        .with_source(Source::Remote { write_through: true });
    let model = FactListModel::new(use_case, &context, logger).with_facts_count(1);

    let screen = Arc::new(());
    let shown = Arc::new(Mutex::new(Vec::new()));
    let sink = shown.clone();
    model.items.subscribe(&screen, move |items: Vec<FactItem>| *sink.lock().unwrap() = items);

    model.load_facts().await;
    context.flush().await;
    let request_text = server.join().unwrap();

    assert!(request_text.contains("number=1"));
    assert_eq!(
        *shown.lock().unwrap(),
        vec![FactItem { text: "Dogs sweat through their paws.".to_string() }]
    );
    assert!(!model.loading.get());
    assert!(model.error_text.get().is_empty());
}

#[tokio::test]
async fn malformed_base_url_surfaces_as_error_text() {
    let logger = Arc::new(LoggerLocal::silent("fact_list_flow"));
    let context = DeliveryContext::spawn(logger.clone());
    let use_case = LoadFactsUseCase::new(Arc::new(gateway("not a url")), logger.clone());
    let model = FactListModel::new(use_case, &context, logger);

    let screen = Arc::new(());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    model.error_text.subscribe(&screen, move |text: String| sink.lock().unwrap().push(text));

    model.load_facts().await;
    context.flush().await;

    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].is_empty());
    assert!(!errors[1].is_empty());
    assert!(!model.loading.get());
}

#[tokio::test]
async fn configured_gateways_share_one_connection_pool() {
    let (base_url, accepted) = serve_keep_alive(r#"[{"fact":"A"}]"#);
    let config = FactsConfig {
        base_url,
        ..FactsConfig::default()
    };
    let logger = Arc::new(LoggerLocal::silent("gateway_flow"));
    let first = config.build_gateway(logger.clone()).unwrap();
    let second = config.build_gateway(logger).unwrap();

    first.load(GatewayConfiguration::remote(1, false)).await.unwrap();
    first.load(GatewayConfiguration::remote(1, false)).await.unwrap();
    second.load(GatewayConfiguration::remote(1, false)).await.unwrap();

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
