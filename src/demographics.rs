//! Aggregate statistics over the census extract.
//!
//! Every percentage is rounded to one decimal with ties going to the even
//! digit, and every ratio whose denominator can be zero has a defined
//! fallback instead of producing NaN.

use std::fmt;
use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::csv_reader::{read_data, Record};
use crate::dataset::{value_counts, Dataset};
use crate::error::{Error, Result};

const HIGHER_EDUCATION: [&str; 3] = ["Bachelors", "Masters", "Doctorate"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicSummary {
    /// Rows per race, most frequent first.
    #[serde(serialize_with = "ordered_counts")]
    pub race_count: Vec<(String, usize)>,
    pub average_age_men: f64,
    pub percentage_bachelors: f64,
    pub higher_education_rich: f64,
    pub lower_education_rich: f64,
    pub min_hours: u32,
    pub rich_min_workers: f64,
    pub highest_earning_country: String,
    pub highest_earning_country_percentage: f64,
    /// `None` when nobody from India earns >50K.
    pub top_in_occupation: Option<String>,
}

fn ordered_counts<S>(counts: &[(String, usize)], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(counts.len()))?;
    for (value, count) in counts {
        map.serialize_entry(value, count)?;
    }
    map.end()
}

impl DemographicSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for DemographicSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Number of each race:")?;
        for (race, count) in &self.race_count {
            writeln!(f, "  {:<20} {}", race, count)?;
        }
        writeln!(f, "Average age of men: {}", self.average_age_men)?;
        writeln!(f, "Percentage with Bachelors degrees: {}%", self.percentage_bachelors)?;
        writeln!(
            f,
            "Percentage with higher education that earn >50K: {}%",
            self.higher_education_rich
        )?;
        writeln!(
            f,
            "Percentage without higher education that earn >50K: {}%",
            self.lower_education_rich
        )?;
        writeln!(f, "Min work time: {} hours/week", self.min_hours)?;
        writeln!(
            f,
            "Percentage of rich among those who work fewest hours: {}%",
            self.rich_min_workers
        )?;
        writeln!(f, "Country with highest percentage of rich: {}", self.highest_earning_country)?;
        writeln!(
            f,
            "Highest percentage of rich people in country: {}",
            self.highest_earning_country_percentage
        )?;
        write!(f, "Top occupations in India for those who earn >50K: ")?;
        match &self.top_in_occupation {
            Some(occupation) => writeln!(f, "{}", occupation),
            None => writeln!(f, "no data"),
        }
    }
}

/// Round to one decimal place: scale by ten, round half to even, scale back.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `part / whole * 100`, or `None` for an empty group.
fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

fn is_higher_education(record: &Record) -> bool {
    HIGHER_EDUCATION.contains(&record.education.as_str())
}

fn rich_percentage<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Record>,
{
    let (rich, total) = records.into_iter().fold((0usize, 0usize), |(rich, total), r| {
        (rich + r.salary.is_rich() as usize, total + 1)
    });
    percentage(rich, total)
}

/// Country with the highest share of >50K earners; the first country seen
/// wins a tie.
fn highest_earning_country(dataset: &Dataset) -> Option<(String, f64)> {
    let mut tallies = Vec::<(&str, usize, usize)>::new();
    for record in dataset {
        let country = record.native_country.as_str();
        let rich = record.salary.is_rich() as usize;
        match tallies.iter_mut().find(|(c, _, _)| *c == country) {
            Some(tally) => {
                tally.1 += 1;
                tally.2 += rich;
            }
            None => tallies.push((country, 1, rich)),
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (country, total, rich) in tallies {
        let Some(pct) = percentage(rich, total) else {
            continue;
        };
        match best {
            Some((_, best_pct)) if pct <= best_pct => {}
            _ => best = Some((country, pct)),
        }
    }
    best.map(|(country, pct)| (country.to_string(), pct))
}

/// Compute the ten census statistics over an already cleaned dataset.
pub fn summarize(dataset: &Dataset) -> Result<DemographicSummary> {
    debug!(columns = ?dataset.columns(), rows = dataset.len(), "summarizing dataset");

    let min_hours = dataset
        .iter()
        .map(|r| r.hours_per_week)
        .min()
        .ok_or(Error::EmptyDataset)?;

    let race_count = value_counts(dataset.iter().map(|r| r.race.as_str()))
        .into_iter()
        .map(|(race, count)| (race.to_string(), count))
        .collect::<Vec<_>>();

    let (men, men_age) = dataset
        .iter()
        .filter(|r| r.sex == "Male")
        .fold((0usize, 0u64), |(n, sum), r| (n + 1, sum + r.age as u64));
    let average_age_men = if men == 0 {
        0.0
    } else {
        round1(men_age as f64 / men as f64)
    };

    let bachelors = dataset.count_where(|r| r.education == "Bachelors");
    let percentage_bachelors = percentage(bachelors, dataset.len()).map_or(0.0, round1);

    let higher_education_rich =
        rich_percentage(dataset.iter().filter(|r| is_higher_education(r))).map_or(0.0, round1);
    let lower_education_rich =
        rich_percentage(dataset.iter().filter(|r| !is_higher_education(r))).map_or(0.0, round1);

    let rich_min_workers =
        rich_percentage(dataset.iter().filter(|r| r.hours_per_week == min_hours)).map_or(0.0, round1);

    let (highest_earning_country, country_pct) =
        highest_earning_country(dataset).ok_or(Error::EmptyDataset)?;
    debug!(country = %highest_earning_country, pct = country_pct, "highest earning country");

    let top_in_occupation = value_counts(
        dataset
            .iter()
            .filter(|r| r.native_country == "India" && r.salary.is_rich())
            .map(|r| r.occupation.as_str()),
    )
    .first()
    .map(|(occupation, _)| occupation.to_string());

    Ok(DemographicSummary {
        race_count,
        average_age_men,
        percentage_bachelors,
        higher_education_rich,
        lower_education_rich,
        min_hours,
        rich_min_workers,
        highest_earning_country,
        highest_earning_country_percentage: round1(country_pct),
        top_in_occupation,
    })
}

/// Load the census file at `path` and summarize it, printing the report to
/// stdout when `print_data` is set.
pub fn demographic_data_analyzer<P: AsRef<Path>>(path: P, print_data: bool) -> Result<DemographicSummary> {
    let dataset = read_data(path.as_ref())?;
    let summary = summarize(&dataset)?;
    if print_data {
        print!("{}", summary);
    }
    Ok(summary)
}
