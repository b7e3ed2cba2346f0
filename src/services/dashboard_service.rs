use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Overview,
    Emission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
        }
    }
}

struct ChartDefinition {
    id: &'static str,
    title: &'static str,
    file: &'static str,
    x_column: &'static str,
    y_column: &'static str,
    kind: ChartKind,
}

const OVERVIEW_CHARTS: &[ChartDefinition] = &[
    ChartDefinition {
        id: "yearly-emissions",
        title: "Global CO2 emissions per year (Mt)",
        file: "co2_emissions_by_year.csv",
        x_column: "year",
        y_column: "emissions_mt",
        kind: ChartKind::Line,
    },
    ChartDefinition {
        id: "fuel-type-emissions",
        title: "Average CO2 emissions by fuel type (g/km)",
        file: "fuel_type_emissions.csv",
        x_column: "fuel_type",
        y_column: "avg_co2_g_km",
        kind: ChartKind::Bar,
    },
];

const EMISSION_CHARTS: &[ChartDefinition] = &[
    ChartDefinition {
        id: "vehicle-class-emissions",
        title: "Average CO2 emissions by vehicle class (g/km)",
        file: "vehicle_class_emissions.csv",
        x_column: "vehicle_class",
        y_column: "avg_co2_g_km",
        kind: ChartKind::Bar,
    },
    ChartDefinition {
        id: "engine-size-emissions",
        title: "Engine size (L) against CO2 emissions (g/km)",
        file: "engine_size_emissions.csv",
        x_column: "engine_size_l",
        y_column: "co2_g_km",
        kind: ChartKind::Scatter,
    },
];

/// A chart ready for the template; the browser fetches `data_url` and plots it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub id: String,
    pub title: String,
    pub data_url: String,
    pub x_column: String,
    pub y_column: String,
    pub kind: ChartKind,
}

#[derive(Clone, Debug)]
pub struct DashboardService {
    static_dir: PathBuf,
}

impl DashboardService {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    /// Charts whose CSV file is present and carries both plotted columns.
    pub async fn charts(&self, dashboard: Dashboard) -> Vec<ChartView> {
        let definitions = match dashboard {
            Dashboard::Overview => OVERVIEW_CHARTS,
            Dashboard::Emission => EMISSION_CHARTS,
        };

        let mut charts = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if self.has_columns(definition).await {
                charts.push(ChartView {
                    id: definition.id.to_string(),
                    title: definition.title.to_string(),
                    data_url: format!("/static/data/{}", definition.file),
                    x_column: definition.x_column.to_string(),
                    y_column: definition.y_column.to_string(),
                    kind: definition.kind,
                });
            }
        }
        charts
    }

    async fn has_columns(&self, definition: &ChartDefinition) -> bool {
        let path = self.static_dir.join("data").join(definition.file);
        let first_line = match tokio::fs::File::open(&path).await {
            Ok(file) => BufReader::new(file).lines().next_line().await,
            Err(e) => Err(e),
        };
        let header_line = match first_line {
            Ok(line) => line.unwrap_or_default(),
            Err(e) => {
                warn!("Skipping chart {}: cannot read {}: {}", definition.id, path.display(), e);
                return false;
            }
        };

        let header: Vec<&str> = header_line
            .split(',')
            .map(|column| column.trim().trim_matches('"'))
            .collect();

        let present = header.contains(&definition.x_column) && header.contains(&definition.y_column);
        if !present {
            warn!(
                "Skipping chart {}: {} lacks column {} or {}",
                definition.id,
                path.display(),
                definition.x_column,
                definition.y_column
            );
        }
        present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &std::path::Path, name: &str, contents: &str) {
        let data_dir = dir.join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_charts_skip_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "co2_emissions_by_year.csv",
            "year,emissions_mt\n2020,34800\n2021,36300\n",
        );

        let service = DashboardService::new(dir.path());
        let charts = service.charts(Dashboard::Overview).await;

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, "yearly-emissions");
        assert_eq!(charts[0].data_url, "/static/data/co2_emissions_by_year.csv");
        assert_eq!(charts[0].kind, ChartKind::Line);
    }

    #[tokio::test]
    async fn test_charts_skip_files_without_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "vehicle_class_emissions.csv",
            "class,co2\nCOMPACT,215\n",
        );
        write_csv(
            dir.path(),
            "engine_size_emissions.csv",
            "\"engine_size_l\",\"co2_g_km\"\n2.0,196\n",
        );

        let service = DashboardService::new(dir.path());
        let charts = service.charts(Dashboard::Emission).await;

        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, "engine-size-emissions");
        assert_eq!(charts[0].kind.as_str(), "scatter");
    }

    #[tokio::test]
    async fn test_charts_read_only_the_header_line() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "co2_emissions_by_year.csv", "");
        write_csv(
            dir.path(),
            "fuel_type_emissions.csv",
            "fuel,co2\nfuel_type,avg_co2_g_km\n",
        );

        let service = DashboardService::new(dir.path());
        assert!(service.charts(Dashboard::Overview).await.is_empty());
    }

    #[tokio::test]
    async fn test_bundled_data_covers_every_chart() {
        let service = DashboardService::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"));
        assert_eq!(service.charts(Dashboard::Overview).await.len(), 2);
        assert_eq!(service.charts(Dashboard::Emission).await.len(), 2);
    }
}
