use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{ParticleRecord, ParticleTable, RawRecord, REQUIRED_COLUMNS};

type Result<T> = std::result::Result<T, DataLoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a particle list from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "mcid": 211, "tau": ..., "E": ..., ... }, ...]`
/// * `.parquet` – flat numeric columns with the same names
/// * anything else (`.csv`, `.dat`, no extension, ...) – comma-separated
///   with a header row (`mcid,tau,x,y,eta,E,px,py,pz` as written by the sampler)
///
/// Column order does not matter and extra columns are ignored, but every
/// name in [`REQUIRED_COLUMNS`] must be present.
pub fn load_file(path: &Path) -> Result<ParticleTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        _ => load_csv(path)?,
    };
    log::debug!("{}: {} rows", path.display(), table.len());
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Locate every required column among `names`, in [`REQUIRED_COLUMNS`] order.
fn column_positions(names: &[&str]) -> Result<[usize; 8]> {
    let mut positions = [0; 8];
    for (slot, required) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = names
            .iter()
            .position(|&h| h == required)
            .ok_or(DataLoadError::MissingColumn(required))?;
    }
    Ok(positions)
}

/// Species ids are integers; tolerate `211.0` but nothing fractional.
fn mcid_from_f64(value: f64, row: usize) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(DataLoadError::InvalidValue {
            row,
            column: "mcid",
            value: value.to_string(),
        })
    }
}

fn finish_record(raw: RawRecord, row: usize) -> Result<ParticleRecord> {
    Ok(ParticleRecord {
        mcid: mcid_from_f64(raw.mcid, row)?,
        tau: raw.tau,
        x: raw.x,
        eta: raw.eta,
        energy: raw.energy,
        px: raw.px,
        py: raw.py,
        pz: raw.pz,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Fields are trimmed, so fixed-width output like `  211,  1.2e+00` loads.
/// Numbers are parsed strictly: anything `f64::from_str` rejects is an error
/// (the literal spellings `nan` and `inf` are accepted).
fn load_csv(path: &Path) -> Result<ParticleTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    let idx = column_positions(&headers.iter().collect::<Vec<_>>())?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        let mut values = [0.0; 8];
        for (k, value) in values.iter_mut().enumerate() {
            let text = record.get(idx[k]).unwrap_or("");
            *value = text.parse::<f64>().map_err(|_| DataLoadError::InvalidValue {
                row: row_no,
                column: REQUIRED_COLUMNS[k],
                value: text.to_string(),
            })?;
        }

        let [mcid, tau, x, eta, energy, px, py, pz] = values;
        let raw = RawRecord {
            mcid,
            tau,
            x,
            eta,
            energy,
            px,
            py,
            pz,
        };
        records.push(finish_record(raw, row_no)?);
    }

    Ok(ParticleTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "mcid": 211, "tau": 10.2, "x": 1.1, "eta": 0.3,
///     "E": 0.61, "px": 0.2, "py": -0.4, "pz": 0.12 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<ParticleTable> {
    let root: JsonValue = serde_json::from_reader(BufReader::new(open(path)?))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataLoadError::Schema("expected top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataLoadError::Schema(format!("row {i} is not a JSON object")))?;
        column_positions(&obj.keys().map(String::as_str).collect::<Vec<_>>())?;

        let raw: RawRecord = serde_json::from_value(row.clone())?;
        records.push(finish_record(raw, i)?);
    }

    Ok(ParticleTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat numeric column per attribute.
///
/// Integer and floating columns (32 or 64 bit) are accepted. Nulls become
/// NaN and flow on like any other non-finite value, except in `mcid` where
/// they are rejected.
fn load_parquet(path: &Path) -> Result<ParticleTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    // Check the schema up front so a file with no row groups still reports
    // missing columns.
    let schema = builder.schema().clone();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let idx = column_positions(&names)?;

    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let columns = idx
            .iter()
            .zip(REQUIRED_COLUMNS)
            .map(|(&i, name)| column_as_f64(batch.column(i), name))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let raw = RawRecord {
                mcid: columns[0][row],
                tau: columns[1][row],
                x: columns[2][row],
                eta: columns[3][row],
                energy: columns[4][row],
                px: columns[5][row],
                py: columns[6][row],
                pz: columns[7][row],
            };
            records.push(finish_record(raw, row_no)?);
        }
    }

    Ok(ParticleTable::from_records(records))
}

/// Widen a numeric Arrow column to `f64`.
fn column_as_f64(col: &Arc<dyn Array>, name: &'static str) -> Result<Vec<f64>> {
    let values = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.iter().map(|v| v.unwrap_or(f64::NAN)).collect()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.iter().map(|v| v.map_or(f64::NAN, |i| i as f64)).collect()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.iter().map(|v| v.map_or(f64::NAN, f64::from)).collect()),
        _ => None,
    };
    values.ok_or_else(|| {
        DataLoadError::Schema(format!(
            "column '{name}' has type {:?}, expected a numeric column",
            col.data_type()
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "mcid,tau,x,y,eta,E,px,py,pz";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_sampler_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "particle_list_1.dat",
            &format!(
                "{HEADER}\n  211,1.00000000e+01,1.0,2.0,0.1,1.0,1.0,0.0,0.0\n2212,5.0,0.0,0.0,0.0,2.0,0.5,0.5,0.1\n"
            ),
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.mcid(), &[211, 2212]);
        assert_eq!(table.tau(), &[10.0, 5.0]);
        // the transverse coordinate `y` is skipped, so eta is the 5th field
        let first = table.record(0).unwrap();
        assert_eq!((first.x, first.eta, first.energy), (1.0, 0.1, 1.0));
        assert_eq!(table.record(1).unwrap().pz, 0.1);
    }

    #[test]
    fn column_order_is_irrelevant() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "shuffled.csv",
            "pz,py,px,E,eta,x,tau,mcid\n0.3,0.2,0.1,1.0,0.0,0.0,2.0,321\n",
        );

        let r = load_file(&path).unwrap().record(0).unwrap();
        assert_eq!(r.mcid, 321);
        assert_eq!((r.px, r.py, r.pz), (0.1, 0.2, 0.3));
        assert_eq!(r.tau, 2.0);
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", &format!("{HEADER}\n"));

        let table = load_file(&path).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "no_pz.csv", "mcid,tau,x,eta,E,px,py\n211,1,0,0,1,1,0\n");

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("pz")));
    }

    #[test]
    fn malformed_number_is_invalid_value() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "bad.csv",
            &format!("{HEADER}\n211,1,0,0,0,1,abc,0,0\n"),
        );

        match load_file(&path).unwrap_err() {
            DataLoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, "px");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_literal_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "nan.csv",
            &format!("{HEADER}\n211,nan,0,0,0,1,1,0,0\n"),
        );

        let table = load_file(&path).unwrap();
        assert!(table.tau()[0].is_nan());
    }

    #[test]
    fn integral_float_mcid_is_accepted_fractional_is_not() {
        let dir = TempDir::new().unwrap();
        let ok = write_file(&dir, "ok.csv", &format!("{HEADER}\n2212.0,1,0,0,0,1,1,0,0\n"));
        assert_eq!(load_file(&ok).unwrap().mcid(), &[2212]);

        let bad = write_file(&dir, "bad.csv", &format!("{HEADER}\n211.5,1,0,0,0,1,1,0,0\n"));
        assert!(matches!(
            load_file(&bad).unwrap_err(),
            DataLoadError::InvalidValue { column: "mcid", .. }
        ));
    }

    #[test]
    fn unknown_or_missing_extension_reads_as_csv() {
        let dir = TempDir::new().unwrap();
        let rows = format!("{HEADER}\n211,1,0,0,0,1,1,0,0\n321,2,0,0,0,1,1,0,0\n");

        for name in ["particle_list_1", "particles.out"] {
            let path = write_file(&dir, name, &rows);
            let table = load_file(&path).unwrap();
            assert_eq!(table.mcid(), &[211, 321], "{name}");
        }
    }

    #[test]
    fn non_csv_content_without_extension_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "particle_list_2", "not,a,particle,list\n1,2,3,4\n");
        assert!(matches!(
            load_file(&path).unwrap_err(),
            DataLoadError::MissingColumn("mcid")
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "list.json",
            r#"[{"mcid": 321, "tau": 3.5, "x": 0.0, "y": 1.0, "eta": 0.2,
                 "E": 1.5, "px": 0.3, "py": 0.4, "pz": 0.0}]"#,
        );

        let r = load_file(&path).unwrap().record(0).unwrap();
        assert_eq!(r.mcid, 321);
        assert_eq!(r.energy, 1.5);
        assert_eq!(r.eta, 0.2);
    }

    #[test]
    fn json_missing_key_is_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "list.json",
            r#"[{"mcid": 321, "tau": 3.5, "x": 0.0, "eta": 0.2, "px": 0.3, "py": 0.4, "pz": 0.0}]"#,
        );
        assert!(matches!(
            load_file(&path).unwrap_err(),
            DataLoadError::MissingColumn("E")
        ));
    }

    #[test]
    fn json_root_must_be_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "list.json", r#"{"mcid": 211}"#);
        assert!(matches!(load_file(&path).unwrap_err(), DataLoadError::Schema(_)));
    }

    #[test]
    fn loads_parquet_with_mixed_numeric_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.parquet");

        let mut fields = vec![Field::new("mcid", DataType::Int32, false)];
        let mut arrays: Vec<Arc<dyn Array>> = vec![Arc::new(Int32Array::from(vec![211, 111])) as Arc<dyn Array>];
        for name in &REQUIRED_COLUMNS[1..] {
            fields.push(Field::new(*name, DataType::Float64, false));
            arrays.push(Arc::new(Float64Array::from(vec![1.0, 2.0])));
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.mcid(), &[211, 111]);
        assert_eq!(table.record(1).unwrap().pz, 2.0);
    }
}
