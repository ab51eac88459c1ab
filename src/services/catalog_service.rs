use rand::seq::IndexedRandom;

use crate::{dto::session::BarInput, error::ServiceError, state::game::Bar};

struct CatalogBar {
    id: &'static str,
    name: &'static str,
    neighborhood: &'static str,
    address: &'static str,
    par: u32,
    latitude: f64,
    longitude: f64,
}

const NYC_BARS: [CatalogBar; 11] = [
    CatalogBar {
        id: "bar-1",
        name: "Sing Sing Bar",
        neighborhood: "East Village",
        address: "9 St Marks Pl, New York, NY 10003",
        par: 3,
        latitude: 40.7293,
        longitude: -73.9885,
    },
    CatalogBar {
        id: "bar-2",
        name: "Barcade",
        neighborhood: "Chelsea",
        address: "148 W 24th St, New York, NY 10011",
        par: 4,
        latitude: 40.7447,
        longitude: -73.9955,
    },
    CatalogBar {
        id: "bar-3",
        name: "McSorley's Old Ale House",
        neighborhood: "East Village",
        address: "15 E 7th St, New York, NY 10003",
        par: 3,
        latitude: 40.7284,
        longitude: -73.9896,
    },
    CatalogBar {
        id: "bar-4",
        name: "Sake Bar Decibel",
        neighborhood: "East Village",
        address: "240 E 9th St, New York, NY 10003",
        par: 5,
        latitude: 40.7262,
        longitude: -73.9835,
    },
    CatalogBar {
        id: "bar-5",
        name: "The Copper Still",
        neighborhood: "East Village",
        address: "59 E 7th St, New York, NY 10003",
        par: 4,
        latitude: 40.7272,
        longitude: -73.9847,
    },
    CatalogBar {
        id: "bar-6",
        name: "The Headless Widow",
        neighborhood: "East Village",
        address: "228 E 14th St, New York, NY 10003",
        par: 3,
        latitude: 40.7317,
        longitude: -73.9827,
    },
    CatalogBar {
        id: "bar-7",
        name: "Holiday Cocktail Bar",
        neighborhood: "East Village",
        address: "75 St Marks Pl, New York, NY 10003",
        par: 4,
        latitude: 40.7280,
        longitude: -73.9845,
    },
    CatalogBar {
        id: "bar-8",
        name: "PinwApple Club",
        neighborhood: "East Village",
        address: "509 E 6th St, New York, NY 10009",
        par: 5,
        latitude: 40.7242,
        longitude: -73.9776,
    },
    CatalogBar {
        id: "bar-9",
        name: "Miss Lily's 7A",
        neighborhood: "East Village",
        address: "109 Avenue A, New York, NY 10009",
        par: 4,
        latitude: 40.7255,
        longitude: -73.9826,
    },
    CatalogBar {
        id: "bar-10",
        name: "886",
        neighborhood: "East Village",
        address: "5 St Marks Pl, New York, NY 10003",
        par: 3,
        latitude: 40.7294,
        longitude: -73.9889,
    },
    CatalogBar {
        id: "bar-11",
        name: "Lucinda's",
        neighborhood: "East Village",
        address: "14 1st Ave, New York, NY 10009",
        par: 4,
        latitude: 40.7233,
        longitude: -73.9881,
    },
];

const BONUS_TASKS: [&str; 20] = [
    "Take a group selfie with the bartender",
    "Order a drink in a fake accent",
    "Get someone to toast with you",
    "Compliment a stranger's outfit",
    "Make the bartender laugh",
    "Take a photo doing a cheers pose",
    "Get a bar napkin signed by staff",
    "Strike up a conversation with another group",
    "Order the bartender's favorite drink",
    "Take a photo with the bar's signage",
    "Learn the bartender's name",
    "Share a fun fact with the group",
    "Do a team dance move together",
    "Get a business card from the bar",
    "Ask for a drink recommendation",
    "Take a photo of the team in action",
    "Toast to the birthday person",
    "Get someone to join your photo",
    "Find something unique about the bar",
    "Make a new friend at the bar",
];

impl From<&CatalogBar> for Bar {
    fn from(bar: &CatalogBar) -> Self {
        Self {
            id: bar.id.to_string(),
            name: bar.name.to_string(),
            neighborhood: bar.neighborhood.to_string(),
            address: bar.address.to_string(),
            par: bar.par,
            latitude: Some(bar.latitude),
            longitude: Some(bar.longitude),
            bonus_task: None,
        }
    }
}

/// Every built-in bar, in catalog order.
pub fn bars() -> Vec<Bar> {
    NYC_BARS.iter().map(Bar::from).collect()
}

/// Built-in bar with this id.
pub fn find_bar(id: &str) -> Option<Bar> {
    NYC_BARS.iter().find(|bar| bar.id == id).map(Bar::from)
}

/// The whole bonus task pool.
pub fn bonus_tasks() -> Vec<String> {
    BONUS_TASKS.iter().map(|task| task.to_string()).collect()
}

/// Draw one task uniformly from the pool.
pub fn random_bonus_task() -> String {
    BONUS_TASKS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(BONUS_TASKS[0])
        .to_string()
}

/// Turn the requested course into session bars.
///
/// A catalog id yields a copy of the catalog bar with the provided fields laid over it, so
/// the session keeps its own snapshot of the stop. Unknown ids must carry a name and a par.
pub fn resolve_course(
    inputs: Vec<BarInput>,
    assign_bonus_tasks: bool,
) -> Result<Vec<Bar>, ServiceError> {
    inputs
        .into_iter()
        .map(|input| {
            let mut bar = resolve_bar(input)?;
            if assign_bonus_tasks && bar.bonus_task.is_none() {
                bar.bonus_task = Some(random_bonus_task());
            }
            Ok(bar)
        })
        .collect()
}

fn resolve_bar(input: BarInput) -> Result<Bar, ServiceError> {
    let id = input.id.trim().to_string();
    let base = match find_bar(&id) {
        Some(bar) => bar,
        None => {
            let (Some(name), Some(par)) = (input.name.clone(), input.par) else {
                return Err(ServiceError::InvalidInput(format!(
                    "bar `{id}` is not in the catalog; name and par are required"
                )));
            };
            Bar {
                id: id.clone(),
                name,
                neighborhood: String::new(),
                address: String::new(),
                par,
                latitude: None,
                longitude: None,
                bonus_task: None,
            }
        }
    };

    Ok(Bar {
        id,
        name: input.name.map(|name| name.trim().to_string()).unwrap_or(base.name),
        neighborhood: input.neighborhood.unwrap_or(base.neighborhood),
        address: input.address.unwrap_or(base.address),
        par: input.par.unwrap_or(base.par),
        latitude: input.latitude.or(base.latitude),
        longitude: input.longitude.or(base.longitude),
        bonus_task: input.bonus_task.or(base.bonus_task),
    })
}
