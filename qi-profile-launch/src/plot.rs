// © 2023, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Preparation of the data behind the quantifier instantiation and
//! execution time plots. The charts are rendered by an external plotting
//! tool from the files written here.

use crate::errors::{ErrorKind, Result};
use log::info;
use qi_profile_analyzer::{
    comparison::{self, VariantTable},
    record::EXECUTION_TIME_COLUMN,
    statistics::ExecutionTimeSummary,
    ResultTable,
};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Output name used when several tables are compared and no name is given.
pub const MULTI_NAME: &str = "multi";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotOptions {
    pub csv_paths: Vec<PathBuf>,
    pub filter_anonymous: bool,
    /// Prefix of the output files.
    pub name: Option<PathBuf>,
    pub top: Option<usize>,
    pub variants: Option<Vec<String>>,
    pub qi_size: [u32; 2],
    pub execution_time_size: [u32; 2],
    pub start_at_zero_qi: bool,
    pub start_at_zero_execution_time: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// A single measurement per quantifier.
    Bar,
    Box,
    Histogram,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Figure width and height in inches.
    pub size: [u32; 2],
    pub start_at_zero: bool,
    pub data: PathBuf,
}

/// Description of the charts, read by the plotting tool.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotSpec {
    pub variants: Vec<String>,
    pub quantifier_instantiations: ChartSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_statistics: Option<ExecutionTimeSummary>,
}

/// The files written for one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotOutputs {
    pub qi_data: PathBuf,
    pub execution_time_data: Option<PathBuf>,
    pub spec: PathBuf,
}

fn output_path(name: &Path, suffix: &str) -> PathBuf {
    let mut path = name.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn load_variant(label: String, csv_path: &Path, filter_anonymous: bool) -> Result<VariantTable> {
    info!("Reading {}.", csv_path.display());
    let table = ResultTable::read_csv(fs::File::open(csv_path)?)?;
    let mut variant = VariantTable::from_result_table(label, &table);
    if filter_anonymous {
        variant.filter_anonymous();
    }
    Ok(variant)
}

fn write_csv<S: Serialize>(path: &Path, header: &[&str], rows: &[S]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn qi_chart_kind(variant: &VariantTable) -> ChartKind {
    if variant.rows().len() == 1 {
        ChartKind::Bar
    } else {
        ChartKind::Box
    }
}

/// Reads the result tables and writes the plot inputs next to the output
/// name.
pub fn prepare(options: &PlotOptions) -> Result<PlotOutputs> {
    if options.csv_paths.is_empty() {
        return Err(ErrorKind::Configuration("at least one CSV file is required".to_string()).into());
    }
    if let Some(variants) = &options.variants {
        if variants.len() != options.csv_paths.len() {
            return Err(ErrorKind::Configuration(
                "Number of variants must match the number of CSV files".to_string(),
            )
            .into());
        }
    }
    if options.csv_paths.len() == 1 {
        prepare_single(options, &options.csv_paths[0])
    } else {
        prepare_multiple(options)
    }
}

fn prepare_single(options: &PlotOptions, csv_path: &Path) -> Result<PlotOutputs> {
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| csv_path.with_extension(""));
    let label = match &options.variants {
        Some(variants) => variants[0].clone(),
        None => comparison::default_variant_label(&file_stem(csv_path)),
    };
    let mut variant = load_variant(label, csv_path, options.filter_anonymous)?;
    if let Some(top) = options.top {
        variant.retain_top(top);
    }
    variant.sort_by_first_row();

    let qi_data = output_path(&name, ".qi.csv");
    let header: Vec<&str> = variant.quantifiers().iter().map(String::as_str).collect();
    write_csv(&qi_data, &header, variant.rows())?;
    info!("Quantifier instantiations written to {}.", qi_data.display());

    // The distribution of a single measurement is not worth a plot.
    let times = variant.execution_times();
    let (execution_time, execution_time_statistics) = if times.len() > 1 {
        let data = output_path(&name, ".execution_time.csv");
        let rows: Vec<[f64; 1]> = times.iter().map(|time| [*time]).collect();
        write_csv(&data, &[EXECUTION_TIME_COLUMN], &rows)?;
        info!("Execution times written to {}.", data.display());
        let chart = ChartSpec {
            kind: ChartKind::Histogram,
            size: options.execution_time_size,
            start_at_zero: options.start_at_zero_execution_time,
            data,
        };
        (Some(chart), ExecutionTimeSummary::from_times(times))
    } else {
        (None, None)
    };

    let spec = PlotSpec {
        variants: vec![variant.label.clone()],
        quantifier_instantiations: ChartSpec {
            kind: qi_chart_kind(&variant),
            size: options.qi_size,
            start_at_zero: options.start_at_zero_qi,
            data: qi_data,
        },
        execution_time,
        execution_time_statistics,
    };
    finish(&name, spec)
}

fn prepare_multiple(options: &PlotOptions) -> Result<PlotOutputs> {
    let labels: Vec<String> = match &options.variants {
        Some(variants) => variants.clone(),
        None => options
            .csv_paths
            .iter()
            .map(|path| comparison::default_variant_label(&file_stem(path)))
            .collect(),
    };
    let mut variants = labels
        .into_iter()
        .zip(&options.csv_paths)
        .map(|(label, path)| load_variant(label, path, options.filter_anonymous))
        .collect::<Result<Vec<_>>>()?;
    if let Some(top) = options.top {
        comparison::retain_common_top(&mut variants, top);
    }
    for variant in &mut variants {
        variant.sort_by_median();
    }
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| PathBuf::from(MULTI_NAME));

    let qi_data = output_path(&name, ".qi.csv");
    let melted = comparison::melt(&variants);
    write_csv(&qi_data, &["Variant", "quantifier", "instantiations"], &melted)?;
    info!("Quantifier instantiations written to {}.", qi_data.display());

    let execution_time_data = output_path(&name, ".execution_time.csv");
    let (header, rows) = comparison::execution_time_columns(&variants);
    write_csv(&execution_time_data, &header, &rows)?;
    info!("Execution times written to {}.", execution_time_data.display());

    let spec = PlotSpec {
        variants: variants.iter().map(|variant| variant.label.clone()).collect(),
        quantifier_instantiations: ChartSpec {
            kind: qi_chart_kind(&variants[0]),
            size: options.qi_size,
            start_at_zero: options.start_at_zero_qi,
            data: qi_data,
        },
        execution_time: Some(ChartSpec {
            kind: ChartKind::Box,
            size: options.execution_time_size,
            start_at_zero: options.start_at_zero_execution_time,
            data: execution_time_data,
        }),
        execution_time_statistics: None,
    };
    finish(&name, spec)
}

fn finish(name: &Path, spec: PlotSpec) -> Result<PlotOutputs> {
    let spec_path = output_path(name, ".plot.toml");
    fs::write(&spec_path, toml::to_string(&spec)?)?;
    info!("Plot description written to {}.", spec_path.display());
    Ok(PlotOutputs {
        qi_data: spec.quantifier_instantiations.data,
        execution_time_data: spec.execution_time.map(|chart| chart.data),
        spec: spec_path,
    })
}
