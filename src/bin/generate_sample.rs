use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use household_impact::analysis::{AnalysisFocus, REFORMS};
use household_impact::config::{DEFAULT_DATA_FILE, MAX_DEPENDENTS};
use household_impact::data::schema::{columns, INCOME_SOURCES};

const HOUSEHOLDS: i64 = 2_000;
const STATES: [&str; 12] = ["CA", "TX", "FL", "NY", "PA", "IL", "OH", "GA", "NC", "MI", "WA", "AZ"];
const FOCI: [AnalysisFocus; 3] = [
    AnalysisFocus::FederalTaxes,
    AnalysisFocus::StateTaxes,
    AnalysisFocus::NetIncome,
];

/// One synthetic household: identity columns plus every numeric column in
/// the order of [`numeric_columns`].
struct Household {
    id: i64,
    state: &'static str,
    married: bool,
    values: Vec<Option<f64>>,
}

fn numeric_columns() -> Vec<String> {
    let mut names: Vec<String> = [
        columns::AGE_OF_HEAD,
        columns::AGE_OF_SPOUSE,
        columns::NUMBER_OF_DEPENDENTS,
        columns::NUMBER_OF_TAX_UNITS,
        columns::HOUSEHOLD_WEIGHT,
        columns::GROSS_INCOME,
        columns::BASELINE_FEDERAL_TAX,
        columns::BASELINE_NET_INCOME,
        columns::STATE_INCOME_TAX,
        columns::PROPERTY_TAXES,
        columns::TOTAL_CHANGE_FEDERAL_TAX,
        columns::PCT_CHANGE_FEDERAL_TAX,
        columns::TOTAL_CHANGE_STATE_TAX,
        columns::PCT_CHANGE_STATE_TAX,
        columns::TOTAL_CHANGE_NET_INCOME,
        columns::PCT_CHANGE_NET_INCOME,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    names.extend((1..=MAX_DEPENDENTS).map(columns::dependent_age));
    names.extend(INCOME_SOURCES.iter().map(|(_, column)| column.to_string()));
    for focus in FOCI {
        names.extend(REFORMS.iter().map(|r| focus.reform_column(r.column_suffix)));
    }
    names
}

fn percent_of(change: f64, baseline: f64) -> f64 {
    if baseline.abs() < f64::EPSILON {
        0.0
    } else {
        change / baseline * 100.0
    }
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reform deltas under a dollar are dropped so every recorded delta is
/// well above the significance threshold.
fn delta(value: f64) -> f64 {
    let value = cents(value);
    if value.abs() < 1.0 {
        0.0
    } else {
        value
    }
}

fn generate_household(id: i64, rng: &mut StdRng) -> Household {
    let state = STATES[rng.gen_range(0..STATES.len())];
    let married = rng.gen_bool(0.5);
    let age_head = rng.gen_range(19..86) as f64;
    let age_spouse = married.then(|| (age_head + rng.gen_range(-6.0..6.0)).round().max(18.0));
    let dependents: usize = match rng.gen_range(0..100) {
        0..=44 => 0,
        45..=64 => 1,
        65..=84 => 2,
        85..=94 => 3,
        _ => rng.gen_range(4..=6),
    };
    let tax_units = if rng.gen_bool(0.8) { 1.0 } else { rng.gen_range(2..=3) as f64 };
    let weight = cents(rng.gen_range(5.0..30_000.0));

    let employment = cents(rng.gen_range(0.0..180_000.0));
    let self_employment = if rng.gen_bool(0.15) { cents(rng.gen_range(0.0..90_000.0)) } else { 0.0 };
    let tips = if rng.gen_bool(0.08) { cents(rng.gen_range(0.0..25_000.0)) } else { 0.0 };
    let overtime = if rng.gen_bool(0.2) { cents(rng.gen_range(0.0..20_000.0)) } else { 0.0 };
    let capital_gains = if rng.gen_bool(0.1) { cents(rng.gen_range(0.0..250_000.0)) } else { 0.0 };
    let gross = employment + self_employment + tips + overtime + capital_gains;

    let federal_tax = cents(gross * rng.gen_range(0.0..0.24));
    let state_tax = cents(gross * rng.gen_range(0.0..0.06));
    let property_tax = if rng.gen_bool(0.6) { cents(rng.gen_range(500.0..12_000.0)) } else { 0.0 };
    let net_income = cents(gross - federal_tax - state_tax);

    // Per-reform deltas; net income moves opposite to the combined taxes.
    let mut federal_deltas = Vec::with_capacity(REFORMS.len());
    let mut state_deltas = Vec::with_capacity(REFORMS.len());
    for _ in REFORMS.iter() {
        let federal = if rng.gen_bool(0.35) { delta(rng.gen_range(-2_500.0..800.0)) } else { 0.0 };
        let state = if rng.gen_bool(0.1) { delta(federal * rng.gen_range(0.0..0.15)) } else { 0.0 };
        federal_deltas.push(federal);
        state_deltas.push(state);
    }
    let net_deltas: Vec<f64> = federal_deltas
        .iter()
        .zip(&state_deltas)
        .map(|(f, s)| cents(-(f + s)))
        .collect();

    let total_federal: f64 = federal_deltas.iter().sum();
    let total_state: f64 = state_deltas.iter().sum();
    let total_net: f64 = net_deltas.iter().sum();

    let mut values = vec![
        Some(age_head),
        age_spouse,
        Some(dependents as f64),
        Some(tax_units),
        Some(weight),
        Some(gross),
        Some(federal_tax),
        Some(net_income),
        Some(state_tax),
        Some(property_tax),
        Some(total_federal),
        Some(percent_of(total_federal, federal_tax)),
        Some(total_state),
        Some(percent_of(total_state, state_tax)),
        Some(total_net),
        Some(percent_of(total_net, net_income)),
    ];
    values.extend((0..MAX_DEPENDENTS).map(|i| (i < dependents).then(|| rng.gen_range(0..18) as f64)));
    values.extend([employment, self_employment, tips, overtime, capital_gains].map(Some));
    for deltas in [&federal_deltas, &state_deltas, &net_deltas] {
        values.extend(deltas.iter().map(|&d| Some(d)));
    }

    Household {
        id,
        state,
        married,
        values,
    }
}

fn write_csv(path: &str, numeric: &[String], households: &[Household]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec![
        columns::HOUSEHOLD_ID.to_string(),
        columns::STATE.to_string(),
        columns::IS_MARRIED.to_string(),
    ];
    header.extend(numeric.iter().cloned());
    writer.write_record(&header)?;

    for h in households {
        let mut record = vec![
            h.id.to_string(),
            h.state.to_string(),
            if h.married { "True" } else { "False" }.to_string(),
        ];
        record.extend(
            h.values
                .iter()
                .map(|v| v.map(|x| format!("{x}")).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, numeric: &[String], households: &[Household]) -> anyhow::Result<()> {
    let mut fields = vec![
        Field::new(columns::HOUSEHOLD_ID, DataType::Int64, false),
        Field::new(columns::STATE, DataType::Utf8, false),
        Field::new(columns::IS_MARRIED, DataType::Boolean, false),
    ];
    fields.extend(numeric.iter().map(|name| Field::new(name, DataType::Float64, true)));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(households.iter().map(|h| h.id).collect::<Vec<_>>())),
        Arc::new(StringArray::from(households.iter().map(|h| h.state).collect::<Vec<_>>())),
        Arc::new(BooleanArray::from(households.iter().map(|h| h.married).collect::<Vec<_>>())),
    ];
    for i in 0..numeric.len() {
        let column: Vec<Option<f64>> = households.iter().map(|h| h.values[i]).collect();
        arrays.push(Arc::new(Float64Array::from(column)));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    let numeric = numeric_columns();
    let households: Vec<Household> = (1..=HOUSEHOLDS)
        .map(|id| generate_household(id, &mut rng))
        .collect();

    write_csv(DEFAULT_DATA_FILE, &numeric, &households)?;
    let parquet_path = DEFAULT_DATA_FILE.replace(".csv", ".parquet");
    write_parquet(&parquet_path, &numeric, &households)?;

    println!(
        "Wrote {} households ({} columns) to {DEFAULT_DATA_FILE} and {parquet_path}",
        households.len(),
        numeric.len() + 3
    );
    Ok(())
}
