// Chart output: series are handed to a sink instead of drawn in-process.
use chrono::NaiveDate;
use std::io;
use std::path::Path;

pub trait ChartSink {
    /// `invert_x` puts the most recent date first (leftmost).
    fn plot_series(
        &mut self,
        title: &str,
        points: &[(NaiveDate, f64)],
        invert_x: bool,
    ) -> Result<(), csv::Error>;
}

/// Writes the series as a two-column CSV, ready for any spreadsheet chart.
pub struct CsvChart<W: io::Write> {
    writer: csv::Writer<W>,
}

impl CsvChart<std::fs::File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: io::Write> CsvChart<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: io::Write> ChartSink for CsvChart<W> {
    fn plot_series(
        &mut self,
        title: &str,
        points: &[(NaiveDate, f64)],
        invert_x: bool,
    ) -> Result<(), csv::Error> {
        let mut ordered = points.to_vec();
        ordered.sort_by_key(|(date, _)| *date);
        if invert_x {
            ordered.reverse();
        }

        self.writer.write_record(["date", title])?;
        for (date, value) in ordered {
            self.writer
                .write_record([date.format("%Y-%m-%d").to_string(), value.to_string()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_axis_writes_newest_first() {
        let d = |day| NaiveDate::from_ymd_opt(2021, 2, day).unwrap();
        let points = [(d(1), 1.0), (d(3), 1.5), (d(2), 1.25)];

        let mut chart = CsvChart::from_writer(Vec::new());
        chart.plot_series("cum_return", &points, true).unwrap();
        let out = String::from_utf8(chart.into_inner().unwrap()).unwrap();

        assert_eq!(
            out,
            "date,cum_return\n2021-02-03,1.5\n2021-02-02,1.25\n2021-02-01,1\n"
        );
    }
}
