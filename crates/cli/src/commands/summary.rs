//! Production summary command.

use chrono::{Local, NaiveDate};

use fournil_admin::config::AdminConfig;
use fournil_admin::db;
use fournil_admin::services::production::{DateFilter, GroupBy, SummaryFilter, load_plan};
use fournil_core::ClientId;

/// Arguments of `fournil-cli summary`.
#[derive(Debug, Default)]
pub struct SummaryArgs {
    pub client_id: Option<i32>,
    pub date: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub by_article: bool,
}

impl SummaryArgs {
    fn filter(&self) -> Result<SummaryFilter, Box<dyn std::error::Error>> {
        Ok(SummaryFilter {
            client_id: self.client_id.map(ClientId::new),
            date: DateFilter::parse(self.date.as_deref(), self.start_date, self.end_date)?,
        })
    }

    const fn group_by(&self) -> GroupBy {
        if self.by_article {
            GroupBy::Article
        } else {
            GroupBy::Order
        }
    }
}

/// Load a snapshot, compute the plan and print the filtered view as JSON.
///
/// # Errors
///
/// Returns an error if the filter is invalid, configuration is missing or the
/// snapshot cannot be read.
pub async fn run(args: &SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Validate before touching the database
    let filter = args.filter()?;
    let config = AdminConfig::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    let plan = load_plan(&pool, &config.excluded_order_statuses).await?;

    let today = Local::now().date_naive();
    let view = plan.view(&filter, args.group_by(), today, &Local);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_args() {
        let args = SummaryArgs {
            client_id: Some(3),
            date: Some("today".to_string()),
            ..SummaryArgs::default()
        };
        let filter = args.filter().unwrap();
        assert_eq!(filter.client_id, Some(ClientId::new(3)));
        assert_eq!(filter.date, Some(DateFilter::Today));
        assert_eq!(args.group_by(), GroupBy::Order);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let args = SummaryArgs {
            date: Some("31/12/2026".to_string()),
            by_article: true,
            ..SummaryArgs::default()
        };
        assert!(args.filter().is_err());
        assert_eq!(args.group_by(), GroupBy::Article);
    }
}
