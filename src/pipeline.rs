// src/pipeline.rs

use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::fetch::{self, CmsPayload};
use crate::process;
use crate::schema::write_outputs;

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The pivot table had no data rows; nothing was written.
    NoData,
    Written(Summary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub stores: usize,
    pub product_columns: usize,
    pub skipped_rows: usize,
    pub files: Vec<PathBuf>,
}

/// Fetch → un-pivot → write, once.
pub fn run(config: &Config) -> Result<Outcome> {
    let client = fetch::build_client(config.timeout)?;
    let payload = fetch::fetch_cms_payload(&client, &config.endpoint, config.cache_bust)?;
    process_payload(config, &payload, Local::now())
}

/// Everything after the fetch. Split out so a payload can be replayed
/// without the network.
pub fn process_payload(
    config: &Config,
    payload: &CmsPayload,
    generated_at: DateTime<Local>,
) -> Result<Outcome> {
    let Some(unpivoted) = process::unpivot(
        payload.pivot_rows(),
        &payload.product_map,
        config.code_schema,
    )?
    else {
        info!("no pivot data rows; nothing to write");
        return Ok(Outcome::NoData);
    };

    let stores = config.write_store_list.then_some(&unpivoted.stores);
    let files = write_outputs(
        &config.output_paths(),
        &unpivoted.snapshot,
        stores,
        generated_at,
    )?;

    Ok(Outcome::Written(Summary {
        stores: unpivoted.snapshot.len(),
        product_columns: unpivoted.product_columns,
        skipped_rows: unpivoted.skipped_rows,
        files,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fetch::parse_payload;
    use crate::schema::CodeSchema;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::tempdir;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(endpoint: Url, out_dir: &std::path::Path) -> Config {
        Config {
            out_dir: out_dir.to_path_buf(),
            ..Config::new(endpoint)
        }
    }

    fn offline_config(out_dir: &std::path::Path) -> Config {
        config_for(Url::parse("http://127.0.0.1:9/exec").unwrap(), out_dir)
    }

    async fn serve(body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    async fn run_blocking(config: Config) -> Result<Outcome> {
        tokio::task::spawn_blocking(move || run(&config))
            .await
            .unwrap()
    }

    fn example_body() -> Value {
        json!({
            "pivotData": [
                ["Kode toko", "Nama Toko", "Widget A"],
                ["S1", "Store One", "7"],
                ["S2", "Store Two", "abc"]
            ],
            "productMap": {"Widget A": "P001"}
        })
    }

    #[tokio::test]
    async fn full_run_writes_all_three_files() {
        let server = serve(example_body()).await;
        let tmp = tempdir().unwrap();
        let out_dir = tmp.path().join("docs");
        let endpoint = Url::parse(&format!("{}/exec", server.uri())).unwrap();
        let config = config_for(endpoint, &out_dir);

        let outcome = run_blocking(config.clone()).await.unwrap();

        let Outcome::Written(summary) = outcome else {
            panic!("expected files to be written");
        };
        assert_eq!(summary.stores, 2);
        assert_eq!(summary.files.len(), 3);

        let paths = config.output_paths();
        let stock: Value =
            serde_json::from_str(&fs::read_to_string(&paths.stock).unwrap()).unwrap();
        assert_eq!(
            stock,
            json!({
                "S1": [{"kodeproduk": ["P001"], "namaproduk": "Widget A", "stock": 7}],
                "S2": [{"kodeproduk": ["P001"], "namaproduk": "Widget A", "stock": 0}]
            })
        );
        let status: Value =
            serde_json::from_str(&fs::read_to_string(&paths.status).unwrap()).unwrap();
        assert!(status["lastUpdated"].is_string());
        assert_eq!(
            fs::read_to_string(&paths.store_list).unwrap(),
            "kodetoko,namatoko\nS1,Store One\nS2,Store Two\n"
        );
    }

    #[tokio::test]
    async fn missing_product_map_writes_nothing() {
        let server = serve(json!({"pivotData": [["Kode toko"], ["S1"]]})).await;
        let tmp = tempdir().unwrap();
        let out_dir = tmp.path().join("docs");
        let endpoint = Url::parse(&format!("{}/exec", server.uri())).unwrap();

        let err = run_blocking(config_for(endpoint, &out_dir))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingField("productMap"))
        ));
        assert!(!out_dir.exists());
    }

    #[test]
    fn header_only_pivot_is_a_no_op() {
        let tmp = tempdir().unwrap();
        let config = offline_config(tmp.path());
        let payload = parse_payload(
            &json!({"pivotData": [["Kode toko", "Nama Toko"]], "productMap": {}}).to_string(),
        )
        .unwrap();

        let outcome = process_payload(&config, &payload, Local::now()).unwrap();

        assert_eq!(outcome, Outcome::NoData);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_store_column_writes_nothing() {
        let tmp = tempdir().unwrap();
        let config = offline_config(tmp.path());
        let payload = CmsPayload::new(
            serde_json::from_value(json!([["Nama Toko", "Widget A"], ["Store One", "3"]]))
                .unwrap(),
            Default::default(),
        );

        let err = process_payload(&config, &payload, Local::now()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::MissingStoreColumn(_))
        ));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn legacy_layout_writes_scalar_codes_without_store_list() {
        let tmp = tempdir().unwrap();
        let config = Config {
            out_dir: tmp.path().to_path_buf(),
            ..Config::legacy(Url::parse("http://127.0.0.1:9/exec").unwrap())
        };
        assert_eq!(config.code_schema, CodeSchema::Scalar);
        let payload = parse_payload(&example_body().to_string()).unwrap();

        let outcome = process_payload(&config, &payload, Local::now()).unwrap();

        let Outcome::Written(summary) = outcome else {
            panic!("expected files to be written");
        };
        assert_eq!(summary.files.len(), 2);
        assert!(!config.output_paths().store_list.exists());
        let stock: Value =
            serde_json::from_str(&fs::read_to_string(config.output_paths().stock).unwrap())
                .unwrap();
        assert_eq!(stock["S1"][0]["kodeproduk"], json!("P001"));
    }
}
