mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use support::env::ConfigHomeGuard;
use support::http::{CannedServer, json_response};
use unicorn_board::config::{self, AppConfig, GraphType};
use unicorn_board::egui_app::controller::EguiController;
use unicorn_board::http_client::RetryConfig;
use unicorn_board::record_service::HttpRecordService;
use unicorn_board::records::{EngineError, RecordId};

const RECORDS: &str = r#"{"data":[
    {"id":1,"year":"2020","company":"A","asset":"1,000","debt":"20"},
    {"id":2,"year":"2019","company":"B","asset":500,"debt":"10"}
]}"#;

fn wait_for_idle(controller: &mut EguiController) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        controller.poll_jobs();
        if !controller.is_loading() {
            return;
        }
        assert!(Instant::now() < deadline, "controller never went idle");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn http_controller(server: &CannedServer) -> EguiController {
    let service = HttpRecordService::new(&server.base_url)
        .unwrap()
        .with_retry(RetryConfig::none());
    EguiController::new(Arc::new(service), AppConfig::default())
}

#[test]
fn load_delete_and_refetch_over_http() {
    let server = CannedServer::start(vec![
        json_response(200, RECORDS),
        json_response(200, r#"{"success":true,"message":"Rows deleted successfully"}"#),
        json_response(
            200,
            r#"{"data":[{"id":1,"year":"2020","company":"A","asset":"1,000","debt":"20"}]}"#,
        ),
    ]);
    let mut controller = http_controller(&server);

    controller.start();
    wait_for_idle(&mut controller);
    let series = controller.chart_series();
    assert_eq!(series.labels, vec!["2019", "2020"]);
    assert_eq!(series.datasets.len(), 2);
    assert_eq!(series.datasets[0].points, vec![500.0, 1000.0]);

    controller.toggle_row_selection(0);
    assert!(controller.selection().contains(&RecordId::Int(2)));
    controller.delete_selected().unwrap();
    wait_for_idle(&mut controller);

    let requests = server.finish();
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/fetch_uploaded_data", "/delete_rows", "/fetch_uploaded_data"]
    );
    assert_eq!(controller.sorted_view().len(), 1);
    assert!(controller.selection().is_empty());
    assert_eq!(controller.ui.status.text, "1 records loaded");
}

#[test]
fn prediction_failure_over_http_keeps_previous_result() {
    let server = CannedServer::start(vec![
        json_response(200, r#"{"predicted_probability":0.3,"is_unicorn":false}"#),
        json_response(
            400,
            r#"{"error":"Not enough data to make predictions. At least 5 rows are required."}"#,
        ),
    ]);
    let mut controller = http_controller(&server);

    controller.request_prediction();
    wait_for_idle(&mut controller);
    controller.request_prediction();
    wait_for_idle(&mut controller);
    server.finish();

    let prediction = controller.prediction().unwrap();
    assert!(!prediction.is_unicorn);
    assert!(matches!(
        controller.last_error(),
        Some(EngineError::Fetch(message)) if message.starts_with("Not enough data")
    ));
    assert!(controller.ui.view.visualization_visible);
}

#[test]
fn graph_type_choice_is_not_written_to_the_config_home() {
    let temp = tempfile::tempdir().unwrap();
    let _guard = ConfigHomeGuard::set(temp.path().to_path_buf());

    let mut controller = EguiController::from_config(AppConfig::default()).unwrap();
    controller.set_graph_type(GraphType::Bar);
    assert_eq!(controller.ui.chart.graph_type, GraphType::Bar);

    let config_file = temp
        .path()
        .join(unicorn_board::app_dirs::APP_DIR_NAME)
        .join(config::CONFIG_FILE_NAME);
    assert!(!config_file.exists());
    assert_eq!(config::load_or_default().unwrap().chart.graph_type, GraphType::Line);
}

#[test]
fn configured_graph_type_seeds_the_first_frame() {
    let mut config = AppConfig::default();
    config.chart.graph_type = GraphType::Bar;
    let controller = EguiController::from_config(config).unwrap();
    assert_eq!(controller.ui.chart.graph_type, GraphType::Bar);
}

#[test]
fn bad_base_url_is_a_config_error() {
    let mut config = AppConfig::default();
    config.service.base_url = "not a url".into();
    assert!(matches!(
        EguiController::from_config(config),
        Err(config::ConfigError::BaseUrl { .. })
    ));
}
