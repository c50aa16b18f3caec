//! Interactive browse loop: the city table, search and the weather view.

use city_weather_core::{CityLookup, Session, View, WeatherSummary};
use inquire::{InquireError, Select, Text};
use std::fmt;

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    LoadMore,
    Search,
    ShowQueryWeather,
    PickCity,
    Back,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
struct Choice {
    label: String,
    action: Action,
}

impl Choice {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn browse_choices(lookup: &CityLookup) -> Vec<Choice> {
    let mut choices = Vec::new();
    let query = lookup.query().trim();

    if query.is_empty() {
        choices.push(Choice::new("Load more", Action::LoadMore));
        choices.push(Choice::new("Search cities", Action::Search));
    } else {
        choices.push(Choice::new(
            format!("Show weather for \"{query}\""),
            Action::ShowQueryWeather,
        ));
        choices.push(Choice::new("Change search (empty to clear)", Action::Search));
    }
    if !lookup.visible_rows().is_empty() {
        choices.push(Choice::new("Show weather for a listed city", Action::PickCity));
    }
    choices.push(Choice::new("Quit", Action::Quit));
    choices
}

fn detail_choices() -> Vec<Choice> {
    vec![
        Choice::new("Back to cities", Action::Back),
        Choice::new("Quit", Action::Quit),
    ]
}

/// `None` when the user cancelled the prompt.
fn answered<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn run(mut session: Session) -> anyhow::Result<()> {
    session.start().await;

    loop {
        let choices = match session.view() {
            View::Browsing => {
                println!("\n{}", render::browse_screen(session.lookup()));
                browse_choices(session.lookup())
            }
            View::WeatherDetail(record) => {
                println!(
                    "\n{}",
                    render::weather_detail(&WeatherSummary::from_record(record))
                );
                detail_choices()
            }
        };

        let Some(choice) = answered(Select::new("What next?", choices).prompt())? else {
            break;
        };

        match choice.action {
            Action::LoadMore => {
                session.load_more().await;
            }
            Action::Search => {
                let prompt = Text::new("Search cities:")
                    .with_initial_value(session.lookup().query())
                    .prompt();
                if let Some(query) = answered(prompt)? {
                    session.search(&query).await;
                }
            }
            Action::ShowQueryWeather => {
                session.submit_search().await;
            }
            Action::PickCity => {
                let names: Vec<String> = session
                    .lookup()
                    .visible_rows()
                    .iter()
                    .map(|c| c.name.clone())
                    .collect();
                if let Some(name) = answered(Select::new("City:", names).prompt())? {
                    session.fetch_weather(&name).await;
                }
            }
            Action::Back => session.back(),
            Action::Quit => break,
        }
    }

    Ok(())
}
