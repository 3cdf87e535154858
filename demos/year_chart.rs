//! Charts the 2022 rainfall of Bordeaux against the whole archive.

use climate_archive::{
    selectable_years, ArchiveConfig, ArchiveError, ClimateArchive, LatLon, Town, Variable,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), ArchiveError> {
    let config = ArchiveConfig::builder()
        .fetch_timeout(Duration::from_secs(30))
        .build();
    let recent: Vec<i32> = selectable_years(&config).into_iter().take(5).collect();
    println!("Most recent selectable years: {recent:?}");

    let archive = ClimateArchive::with_config(config);
    let bordeaux = Town::new("Bordeaux", "Gironde", LatLon(44.8378, -0.5792));

    let Some(chart) = archive
        .year_chart()
        .town(&bordeaux)
        .variable(Variable::Precipitation)
        .year(2022)
        .call()
        .await?
        .into_chart()
    else {
        return Ok(());
    };

    let spec = chart.variable.spec();
    println!("{} - {} ({})", chart.chart.title, chart.town, chart.year);
    for (i, month) in chart.chart.per_month.x_labels.iter().enumerate() {
        let show = |v: Option<f64>| v.map_or("-".to_string(), |v| spec.format_tick(v.round()));
        println!(
            "{month}: min {:>8} max {:>8} {} {:>8} {}",
            show(chart.chart.per_month.min().data[i]),
            show(chart.chart.per_month.max().data[i]),
            chart.year,
            show(chart.chart.per_month.selected_year().data[i]),
            chart.chart.per_month.selected_year().extra_tooltip[i]
                .as_deref()
                .unwrap_or(""),
        );
    }
    println!(
        "Driest year: {:?}, wettest year: {:?}",
        chart.stats.per_day.min_year, chart.stats.per_day.max_year
    );
    Ok(())
}
