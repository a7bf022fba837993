//! Per-request log line.

use std::time::Instant;

use tracing::info;

use super::Next;
use crate::request::Request;
use crate::response::Response;

/// Logs method, path, final status and latency once the inner chain returns.
///
/// Registered innermost, so it reports what the handler (or router) produced.
/// Requests turned away by stages further out never get here.
pub async fn log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let started = Instant::now();

    let res = next.run(req).await;

    info!(
        %method,
        %path,
        status = res.status_code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::method::Method;
    use crate::middleware::BoxedStage;
    use crate::router::Router;
    use crate::status::Status;

    /// Collects everything the fmt subscriber writes.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn delete_chain() -> Next {
        let router = Router::new().on(Method::Delete, "/users/{id}", |_req: Request| async {
            Status::NoContent
        });
        let stages: Vec<BoxedStage> = vec![Arc::new(log)];
        Next::new(stages.into(), Arc::new(router))
    }

    #[tokio::test]
    async fn response_is_passed_through_unchanged() {
        let res = delete_chain().run(Request::test(Method::Delete, "/users/3")).await;

        assert_eq!(res.status_code(), 204);
        assert!(res.body().is_empty());
    }

    #[test]
    fn emits_one_event_with_method_path_and_status() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let res = tracing::subscriber::with_default(subscriber, || {
            futures::executor::block_on(
                delete_chain().run(Request::test(Method::Delete, "/users/3")),
            )
        });
        assert_eq!(res.status_code(), 204);

        let out = captured.text();
        assert_eq!(out.lines().count(), 1, "{out}");
        assert_eq!(out.matches("method=DELETE").count(), 1, "{out}");
        assert_eq!(out.matches("path=/users/3").count(), 1, "{out}");
        assert_eq!(out.matches("status=204").count(), 1, "{out}");
        assert!(out.contains("elapsed_ms="), "{out}");
    }
}
