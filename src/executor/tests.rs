use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::process::classify_curl_output;
use super::*;
use crate::error::{AppError, AppResult};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

/// Serves `response` to every connection; returns the target URL.
async fn spawn_canned_server(response: &'static str) -> AppResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            drop(stream.read(&mut buf).await);
            drop(stream.write_all(response.as_bytes()).await);
            drop(stream.shutdown().await);
        }
    });
    Ok(format!("http://{}/", addr))
}

/// Accepts connections and never answers.
async fn spawn_silent_server() -> AppResult<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    Ok(format!("http://{}/", addr))
}

#[test]
fn status_label_uses_reason_phrase() -> AppResult<()> {
    let cases = [
        (200, "OK"),
        (404, "Not Found"),
        (503, "Service Unavailable"),
        (299, "299"),
    ];
    for (code, expected) in cases {
        let label = status_label(code);
        if label != expected {
            return Err(AppError::validation(format!(
                "status_label({}) = {}, expected {}",
                code, label, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn noop_executor_does_nothing() -> AppResult<()> {
    run_async_test(async {
        let execution = NoopExecutor.execute("http://unused.invalid/").await;
        if execution.classification != "Did nothing." {
            return Err(AppError::validation(format!(
                "Unexpected classification: {}",
                execution.classification
            )));
        }
        Ok(())
    })
}

#[test]
fn native_executor_reports_ok() -> AppResult<()> {
    run_async_test(async {
        let url =
            spawn_canned_server("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .await?;
        let executor = NativeExecutor::new(Duration::from_secs(2))?;
        let execution = executor.execute(&url).await;
        if execution.classification != "OK" {
            return Err(AppError::validation(format!(
                "Expected OK, got {}",
                execution.classification
            )));
        }
        Ok(())
    })
}

#[test]
fn native_executor_reports_not_found() -> AppResult<()> {
    run_async_test(async {
        let url = spawn_canned_server(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await?;
        let executor = NativeExecutor::new(Duration::from_secs(2))?;
        let execution = executor.execute(&url).await;
        if execution.classification != "Not Found" {
            return Err(AppError::validation(format!(
                "Expected Not Found, got {}",
                execution.classification
            )));
        }
        Ok(())
    })
}

#[test]
fn native_executor_reports_timeout() -> AppResult<()> {
    run_async_test(async {
        let url = spawn_silent_server().await?;
        let executor = NativeExecutor::new(Duration::from_millis(100))?;
        let execution = executor.execute(&url).await;
        if execution.classification != TIMEOUT_LABEL {
            return Err(AppError::validation(format!(
                "Expected timeout, got {}",
                execution.classification
            )));
        }
        if execution.elapsed < Duration::from_millis(100) {
            return Err(AppError::validation(format!(
                "Timed out too early: {:?}",
                execution.elapsed
            )));
        }
        Ok(())
    })
}

#[test]
fn native_executor_reports_connection_refused() -> AppResult<()> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let executor = NativeExecutor::new(Duration::from_secs(2))?;
        let execution = executor.execute(&format!("http://{}/", addr)).await;
        let label = execution.classification.to_lowercase();
        if !label.contains("refused") || label.contains("http://") {
            return Err(AppError::validation(format!(
                "Expected a bare connection refused message, got {}",
                execution.classification
            )));
        }
        Ok(())
    })
}

#[test]
fn process_executor_reports_missing_binary() -> AppResult<()> {
    run_async_test(async {
        let executor =
            ProcessExecutor::with_program("hammer-missing-curl-binary", Duration::from_secs(1));
        let execution = executor.execute("http://127.0.0.1:1/").await;
        if !execution.classification.starts_with("Failed to run curl:") {
            return Err(AppError::validation(format!(
                "Unexpected classification: {}",
                execution.classification
            )));
        }
        Ok(())
    })
}

#[test]
fn curl_output_classification() -> AppResult<()> {
    let cases = [
        (Some(0), "200", "", "OK"),
        (Some(0), "404\n", "", "Not Found"),
        (Some(0), "000", "", "No HTTP status from curl"),
        (
            Some(28),
            "000",
            "curl: (28) Operation timed out after 1000 milliseconds",
            TIMEOUT_LABEL,
        ),
        (
            Some(7),
            "000",
            "curl: (7) Failed to connect to 127.0.0.1 port 1: Connection refused\n",
            "Failed to connect to 127.0.0.1 port 1: Connection refused",
        ),
        (Some(6), "", "", "curl exited with status 6"),
        (None, "", "", "curl was terminated by a signal"),
    ];
    for (exit_code, stdout, stderr, expected) in cases {
        let label = classify_curl_output(exit_code, stdout, stderr);
        if label != expected {
            return Err(AppError::validation(format!(
                "classify({:?}, {:?}, {:?}) = {}, expected {}",
                exit_code, stdout, stderr, label, expected
            )));
        }
    }
    Ok(())
}

#[test]
fn build_executor_selects_kind() -> AppResult<()> {
    run_async_test(async {
        let executor = build_executor(crate::args::FetcherKind::Noop, Duration::from_secs(1))?;
        let execution = executor.execute("http://unused.invalid/").await;
        if execution.classification != "Did nothing." {
            return Err(AppError::validation("Expected the noop executor"));
        }
        Ok(())
    })
}
