use moneymaster::AppCommand;
use moneymaster::cli::ledger::NewTransaction;
use moneymaster::core::calculator::{Calculator, CagrInput, DebtPayoffInput, EmiInput};
use moneymaster::core::ledger::{Category, TransactionKind};
use moneymaster::store::{DiskStore, TransactionStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_gemini_mock_server(answer: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "integration-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": answer }] } }]
            })))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(dir: &Path, advisor_url: &str) -> String {
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
profile:
  name: "Alex"
currency: "INR"
privacy_mode: false
data_path: "{}"
advisor:
  base_url: "{}"
  model: "gemini-2.5-flash"
  api_key: "integration-key"
"#,
        dir.join("data").display(),
        advisor_url
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_string_lossy().into_owned()
}

fn expense(title: &str, amount: f64, category: Option<Category>) -> AppCommand {
    AppCommand::AddTransaction(NewTransaction {
        title: title.to_string(),
        amount,
        kind: TransactionKind::Expense,
        category,
        auto_category: category.is_none(),
        notes: None,
    })
}

#[test_log::test(tokio::test)]
async fn test_calculators_run_without_config() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");
    let config_path = missing.to_str();

    let commands = [
        AppCommand::Tools,
        AppCommand::Calc {
            calculator: Calculator::Emi(EmiInput {
                principal: 500000.0,
                rate: 9.5,
                years: 5.0,
                months: None,
            }),
            json: false,
        },
        AppCommand::Calc {
            calculator: Calculator::Cagr(CagrInput {
                start: 10000.0,
                end: 20000.0,
                years: 5.0,
            }),
            json: true,
        },
        // Domain errors are reported as guidance, not failures
        AppCommand::Calc {
            calculator: Calculator::DebtPayoff(DebtPayoffInput {
                balance: 5000.0,
                rate: 18.0,
                monthly_payment: 10.0,
            }),
            json: false,
        },
    ];
    for command in commands {
        info!(?command, "Running");
        let result = moneymaster::run_command(command, config_path).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_invalid_calculator_input_fails() {
    let result = moneymaster::run_command(
        AppCommand::Calc {
            calculator: Calculator::Cagr(CagrInput {
                start: 100.0,
                end: 200.0,
                years: -1.0,
            }),
            json: false,
        },
        Some("/nonexistent/moneymaster/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_full_ledger_flow_with_mock_advisor() {
    let dir = TempDir::new().unwrap();
    let mock_server = test_utils::create_gemini_mock_server("Travel").await;
    let config_path = write_config(dir.path(), &mock_server.uri());
    let config_path = Some(config_path.as_str());

    let commands = [
        AppCommand::AddTransaction(NewTransaction {
            title: "Salary".to_string(),
            amount: 50000.0,
            kind: TransactionKind::Income,
            category: Some(Category::Salary),
            auto_category: false,
            notes: Some("October".to_string()),
        }),
        expense("Groceries", 3200.0, Some(Category::Groceries)),
        expense("Flight to Goa", 8000.0, None),
        AppCommand::ListTransactions {
            kind: None,
            limit: Some(10),
        },
        AppCommand::Summary,
        AppCommand::Ask("How am I doing?".to_string()),
    ];
    for command in commands {
        let result = moneymaster::run_command(command, config_path).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    let store = DiskStore::open(&dir.path().join("data").join("ledger")).unwrap();
    let txs = store.list().unwrap();
    assert_eq!(txs.len(), 3);
    let flight = txs.iter().find(|t| t.title == "Flight to Goa").unwrap();
    assert_eq!(flight.category, Category::Travel);
    let id = flight.id;
    drop(store);

    moneymaster::run_command(AppCommand::RemoveTransaction(id), config_path)
        .await
        .unwrap();
    assert!(
        moneymaster::run_command(AppCommand::RemoveTransaction(id), config_path)
            .await
            .is_err()
    );

    assert!(
        moneymaster::run_command(AppCommand::ClearTransactions { confirmed: false }, config_path)
            .await
            .is_err()
    );
    moneymaster::run_command(AppCommand::ClearTransactions { confirmed: true }, config_path)
        .await
        .unwrap();

    let store = DiskStore::open(&dir.path().join("data").join("ledger")).unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_ledger_commands_require_config() {
    let result = moneymaster::run_command(
        AppCommand::Summary,
        Some("/nonexistent/moneymaster/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}
