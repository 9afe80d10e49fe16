//! Example usage of the retry utility with exponential backoff
//!
//! This example demonstrates how to use the retry functionality
//! with various retry policies for different scenarios.

use media_catalog_core::error::MediaCatalogError;
use media_catalog_core::retry::{retry_with_backoff, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Simulates a flaky network operation that fails intermittently
async fn flaky_network_request(
    attempt_counter: Arc<AtomicU32>,
) -> Result<String, MediaCatalogError> {
    let attempts = attempt_counter.fetch_add(1, Ordering::SeqCst);

    if attempts < 2 {
        // Fail with a retryable error
        Err(MediaCatalogError::NetworkError {
            message: format!("Connection timeout on attempt {}", attempts + 1),
            source: None,
        })
    } else {
        // Success after 2 retries
        Ok(format!("Success after {} attempts", attempts + 1))
    }
}

/// Simulates a provider call that sheds load once before recovering
async fn throttled_provider_call(
    attempt_counter: Arc<AtomicU32>,
) -> Result<String, MediaCatalogError> {
    let attempts = attempt_counter.fetch_add(1, Ordering::SeqCst);

    if attempts == 0 {
        Err(MediaCatalogError::TimeoutError {
            operation: "provider search".to_string(),
            duration_ms: 2000,
        })
    } else {
        Ok("Provider call completed".to_string())
    }
}

/// Simulates an operation that fails with a non-retryable error
async fn validation_operation() -> Result<String, MediaCatalogError> {
    Err(MediaCatalogError::ValidationError {
        message: "Invalid search query".to_string(),
        field: Some("query".to_string()),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Retry Utility Examples ===\n");

    // Example 1: Network request with default retry policy
    println!("1. Network request with default retry policy:");
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let result = retry_with_backoff(
        || flaky_network_request(counter_clone.clone()),
        RetryPolicy::default(),
        |err: &MediaCatalogError| err.is_retryable(),
    )
    .await;

    match result {
        Ok(msg) => println!("   ✓ {}", msg),
        Err(e) => println!("   ✗ Failed: {}", e),
    }
    println!("   Total attempts: {}\n", counter.load(Ordering::SeqCst));

    // Example 2: Provider call with the rate-limit policy
    // (expect a pause around two seconds before the second attempt)
    println!("2. Throttled provider call with the rate-limit policy:");
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let result = retry_with_backoff(
        || throttled_provider_call(counter_clone.clone()),
        RetryPolicy::rate_limit(),
        |err: &MediaCatalogError| err.is_retryable(),
    )
    .await;

    match result {
        Ok(msg) => println!("   ✓ {}", msg),
        Err(e) => println!("   ✗ Failed: {}", e),
    }
    println!("   Total attempts: {}\n", counter.load(Ordering::SeqCst));

    // Example 3: Validation error (non-retryable)
    println!("3. Validation error (should not retry):");
    let counter = Arc::new(AtomicU32::new(0));

    let result = retry_with_backoff(
        || {
            counter.fetch_add(1, Ordering::SeqCst);
            validation_operation()
        },
        RetryPolicy::default(),
        |err: &MediaCatalogError| err.is_retryable(),
    )
    .await;

    match result {
        Ok(msg) => println!("   ✓ {}", msg),
        Err(e) => println!("   ✗ Failed immediately: {}", e),
    }
    println!(
        "   Total attempts: {} (should be 1)\n",
        counter.load(Ordering::SeqCst)
    );

    // Example 4: Exhausting a custom policy
    println!("4. Custom policy against a persistent failure (2 retries, 50ms base delay):");
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let always_fail = || async {
        counter_clone.fetch_add(1, Ordering::SeqCst);
        Err::<String, _>(MediaCatalogError::NetworkError {
            message: "Persistent failure".to_string(),
            source: None,
        })
    };

    let result = retry_with_backoff(
        always_fail,
        RetryPolicy::new(2, 50, 500, true),
        |err: &MediaCatalogError| err.is_retryable(),
    )
    .await;

    match result {
        Ok(msg) => println!("   ✓ {}", msg),
        Err(e) => println!("   ✗ All retries exhausted: {}", e),
    }
    println!(
        "   Total attempts: {} (initial + 2 retries)\n",
        counter.load(Ordering::SeqCst)
    );

    println!("=== Examples Complete ===");
    Ok(())
}
