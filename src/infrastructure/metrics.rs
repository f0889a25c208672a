// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 启用时安装 Prometheus 导出器并注册投递与触发相关指标。
/// 未启用时指标调用是空操作。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!(
        "webhook_deliveries_total",
        "Total number of release webhook deliveries by outcome"
    );
    describe_histogram!(
        "webhook_delivery_duration_seconds",
        "Duration of release webhook deliveries in seconds"
    );
    describe_counter!(
        "build_triggers_total",
        "Total number of build trigger submissions by kind"
    );
    describe_counter!(
        "build_triggers_folded_total",
        "Total number of trigger submissions folded into a pending build"
    );

    info!("Metrics exporter listening on {}", addr);
}
