use stockfolio::FiedlerGraph;
use stockfolio::analyzer::PortfolioAnalyzer;
use stockfolio::chart::CsvChart;
use stockfolio::config::{AppConfig, DcfConfig, NetworkConfig, PortfolioConfig, load_config};
use stockfolio::provider::FmpClient;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from file
    let config: AppConfig = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    if config.portfolio.is_some() || config.dcf.is_some() {
        match build_client(&config) {
            Some(client) => run_market_jobs(&config, client),
            None => warn!("Skipping market-data jobs"),
        }
    }

    if let Some(network_cfg) = &config.network {
        run_network(network_cfg);
    }

    info!("Done.");
}

fn build_client(config: &AppConfig) -> Option<FmpClient> {
    let api_key = match config.api_key() {
        Ok(key) => key,
        Err(e) => {
            error!("{}", e);
            return None;
        }
    };
    match FmpClient::new(&config.api.base_url, &api_key) {
        Ok(client) => Some(client),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            None
        }
    }
}

/// Runs the portfolio statistics and, when configured, the DCF export.
fn run_market_jobs(config: &AppConfig, client: FmpClient) {
    let Some(portfolio_cfg) = &config.portfolio else {
        // The DCF export only needs the provider, not a price table.
        if let Some(dcf_cfg) = &config.dcf {
            info!("Writing DCF worksheet for {}...", dcf_cfg.ticker);
            if let Err(e) = stockfolio::worksheet::write_dcf_csv(
                &client,
                Path::new(&dcf_cfg.output),
                &dcf_cfg.ticker,
            ) {
                warn!("DCF export failed: {}", e);
            }
        }
        return;
    };

    let analyzer = match PortfolioAnalyzer::new(
        client,
        &portfolio_cfg.tickers,
        &portfolio_cfg.weights,
        portfolio_cfg.days,
    ) {
        Ok(a) => a,
        Err(e) => {
            error!("Portfolio analysis aborted: {}", e);
            return;
        }
    };

    report_portfolio(&analyzer, portfolio_cfg);

    if let Some(dcf_cfg) = &config.dcf {
        run_dcf(&analyzer, dcf_cfg);
    }
}

fn report_portfolio(analyzer: &PortfolioAnalyzer<FmpClient>, cfg: &PortfolioConfig) {
    info!("Tickers: {:?} | weights: {:?}", analyzer.tickers(), cfg.weights);
    info!("Average daily return: {:.4}%", analyzer.average_daily_return() * 100.0);
    info!("Price risk: {:.4}", analyzer.calc_risk());
    info!("Return risk: {:.4}%", analyzer.calc_pct_risk() * 100.0);

    let cumulative = match &cfg.chart_output {
        Some(path) => match CsvChart::from_path(path) {
            Ok(mut chart) => match analyzer.graph_return(&mut chart) {
                Ok(c) => {
                    info!("Cumulative return chart data written: {}", path);
                    c
                }
                Err(e) => {
                    warn!("Chart output failed: {}", e);
                    analyzer.cumulative_returns()
                }
            },
            Err(e) => {
                warn!("Cannot open chart output {}: {}", path, e);
                analyzer.cumulative_returns()
            }
        },
        None => analyzer.cumulative_returns(),
    };
    if let (Some(date), Some(value)) = (cumulative.dates.first(), cumulative.cumulative.first()) {
        info!("Cumulative return as of {}: {:.4}", date, value);
    }
}

fn run_dcf(analyzer: &PortfolioAnalyzer<FmpClient>, cfg: &DcfConfig) {
    info!("Writing DCF worksheet for {}...", cfg.ticker);
    if let Err(e) = analyzer.write_dcf_csv(&cfg.output, &cfg.ticker) {
        warn!("DCF export failed: {}", e);
    }
}

fn run_network(cfg: &NetworkConfig) {
    let mut graph = FiedlerGraph::new();
    if graph.build_matrix(&cfg.correlation_file).is_err() {
        // Already logged by the grapher; the other jobs are unaffected.
        return;
    }

    match graph.laplace_matrix() {
        Ok(laplacian) => info!("Laplacian:{}", laplacian),
        Err(e) => warn!("Laplacian failed: {}", e),
    }

    match graph.fiedler_partition() {
        Ok(p) => info!(
            "Fiedler partition (connectivity {:.4}): {:?} | {:?}",
            p.algebraic_connectivity, p.positive, p.negative
        ),
        Err(e) => warn!("Fiedler partition unavailable: {}", e),
    }

    let Some(dot_path) = &cfg.dot_output else {
        return;
    };
    match graph.render_dot() {
        Ok(dot) => match fs::write(dot_path, dot) {
            Ok(()) => info!("Network graph written: {}", dot_path),
            Err(e) => warn!("Failed to write graph: {}", e),
        },
        Err(e) => warn!("Graph rendering failed: {}", e),
    }
}
