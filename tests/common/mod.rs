#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use storefront_rs::models::{OrderSubmission, ServiceResult};
use storefront_rs::repositories::{FileCatalogSource, KeyValueStore};
use storefront_rs::services::SubmissionSink;
use storefront_rs::{Metrics, StorefrontSession};

pub const CART_KEY: &str = "portfolio_cart_v1";

/// Two-service catalog used by the cart scenarios: A costs 100, B costs 50
pub const CATALOG_JSON: &str = r#"{
    "business": {
        "name": "Pixel Studio",
        "currency": "USD",
        "emailTo": "orders@pixel.test"
    },
    "services": [
        {
            "id": "A",
            "name": "Brand Identity",
            "description": "Logo and brand guidelines",
            "category": "Branding",
            "price": 100,
            "turnaroundDays": 5,
            "deliverables": ["Logo files", "Style guide"]
        },
        {
            "id": "B",
            "name": "Landing Page",
            "description": "Responsive single page website",
            "category": "Web",
            "price": 50,
            "turnaroundDays": 3,
            "deliverables": ["HTML/CSS"]
        },
        {
            "id": "C",
            "name": "Social Kit",
            "description": "Templates for brand posts",
            "category": "Branding",
            "price": 19.99,
            "turnaroundDays": 1
        }
    ]
}"#;

mock! {
    pub Sink {}

    #[async_trait]
    impl SubmissionSink for Sink {
        async fn submit(&self, submission: &OrderSubmission) -> ServiceResult<()>;
    }
}

/// Sink that keeps every submission it accepts
#[derive(Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<OrderSubmission>>,
}

impl RecordingSink {
    pub fn submissions(&self) -> Vec<OrderSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit(&self, submission: &OrderSubmission) -> ServiceResult<()> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// Write the fixture catalog into `dir` and return its path
pub fn write_catalog(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("services.json");
    std::fs::write(&path, CATALOG_JSON).unwrap();
    path
}

pub async fn open_session(
    catalog_path: &Path,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn SubmissionSink>,
) -> StorefrontSession {
    StorefrontSession::open(
        &FileCatalogSource::new(catalog_path),
        store,
        CART_KEY,
        sink,
        Arc::new(Metrics::new().unwrap()),
    )
    .await
    .unwrap()
}
