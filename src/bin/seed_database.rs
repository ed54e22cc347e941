//! Showtime Database Seeder
//!
//! A terminal application for seeding a running Showtime API instance with
//! realistic booking data: venues, artists, and the shows that link them.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:3000`
//!
//! Pass `--token YOUR_JWT_TOKEN` when the instance is protected by Keycloak.

use anyhow::{Result, bail};
use chrono::{Duration, Utc};
use clap::{Arg, Command};
use console::style;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use reqwest::Client;
use serde_json::{Value, json};

const CITIES: &[(&str, &str)] = &[
    ("San Francisco", "CA"),
    ("New York", "NY"),
    ("Austin", "TX"),
    ("Nashville", "TN"),
    ("Portland", "OR"),
];

const GENRES: &[&str] = &[
    "Jazz",
    "Reggae",
    "Swing",
    "Classical",
    "Folk",
    "Rock n Roll",
    "Hip-Hop",
    "Blues",
    "Soul",
];

#[derive(Debug, Clone)]
pub struct SeedingConfig {
    pub base_url: String,
    pub jwt_token: Option<String>,
    pub client: Client,
}

#[derive(Debug, Default)]
pub struct CreatedObjects {
    pub venues: Vec<Value>,
    pub artists: Vec<Value>,
    pub shows: Vec<Value>,
}

pub struct DatabaseSeeder {
    config: SeedingConfig,
    created_objects: CreatedObjects,
}

impl DatabaseSeeder {
    pub fn new(base_url: String, jwt_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();

        Self {
            config: SeedingConfig {
                base_url,
                jwt_token,
                client,
            },
            created_objects: CreatedObjects::default(),
        }
    }

    async fn make_request(&self, method: &str, endpoint: &str, data: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut request = match method.to_uppercase().as_str() {
            "GET" => self.config.client.get(&url),
            "POST" => self.config.client.post(&url).header("content-type", "application/json"),
            _ => bail!("Unsupported HTTP method: {method}"),
        };

        if let Some(token) = &self.config.jwt_token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        if let Some(json_data) = data {
            request = request.json(&json_data);
        }

        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response.json::<Value>().await?)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("HTTP {status} {endpoint}: {error_text}")
        }
    }

    pub async fn test_connection(&self) -> Result<()> {
        let health = self.make_request("GET", "/healthz", None).await?;
        if health["status"] != "ok" {
            bail!("API reported unhealthy status: {health}");
        }
        Ok(())
    }

    pub async fn create_venues(&mut self) -> Result<()> {
        println!("{} Creating venues...", style("[1/3]").bold().dim());

        let venue_names = [
            "The Musical Hop",
            "Park Square Live Music & Coffee",
            "The Dueling Pianos Bar",
            "The Velvet Room",
            "Riverside Amphitheater",
            "The Broken Spoke",
        ];

        let mut venues_data = Vec::new();
        {
            let mut rng = rand::rng();
            for (i, name) in venue_names.iter().enumerate() {
                let (city, state) = CITIES[i % CITIES.len()];
                let genre_count = rng.random_range(1..4);
                let genres: Vec<&str> = (0..genre_count)
                    .map(|_| GENRES[rng.random_range(0..GENRES.len())])
                    .collect();
                let seeking_talent = rng.random_bool(0.5);

                venues_data.push(json!({
                    "name": name,
                    "city": city,
                    "state": state,
                    "address": format!("{} Main Street", 100 + i * 25),
                    "phone": format!("555-{:03}-{:04}", i + 1, 1000 + i * 17),
                    "genres": genres,
                    "image_link": format!("https://example.com/venues/{i}.png"),
                    "website": format!("https://example.com/venues/{i}"),
                    "seeking_talent": seeking_talent,
                    "seeking_description": seeking_talent.then_some("Always on the lookout for local acts"),
                }));
            }
        }

        let pb = ProgressBar::new(venues_data.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        for venue_data in venues_data {
            match self.make_request("POST", "/api/venues", Some(venue_data.clone())).await {
                Ok(venue) => self.created_objects.venues.push(venue),
                Err(err) => pb.println(format!(
                    "{} Skipping venue {}: {err}",
                    style("!").yellow(),
                    venue_data["name"]
                )),
            }
            pb.inc(1);
        }
        pb.finish_with_message("venues created");

        println!(
            "{} Created {} venues",
            style("ok").green(),
            self.created_objects.venues.len()
        );
        Ok(())
    }

    pub async fn create_artists(&mut self) -> Result<()> {
        println!("{} Creating artists...", style("[2/3]").bold().dim());

        let artist_names = [
            "Guns N Petals",
            "Matt Quevado",
            "The Wild Sax Band",
            "Velvet Thunder",
            "The Paper Lanterns",
            "Juniper & Pine",
        ];

        let mut artists_data = Vec::new();
        {
            let mut rng = rand::rng();
            for (i, name) in artist_names.iter().enumerate() {
                let (city, state) = CITIES[rng.random_range(0..CITIES.len())];
                let seeking_venue = rng.random_bool(0.5);

                artists_data.push(json!({
                    "name": name,
                    "city": city,
                    "state": state,
                    "phone": format!("555-{:03}-{:04}", 200 + i, 2000 + i * 31),
                    "genres": [GENRES[rng.random_range(0..GENRES.len())]],
                    "image_link": format!("https://example.com/artists/{i}.png"),
                    "seeking_venue": seeking_venue,
                    "seeking_description": seeking_venue.then_some("Looking for venues to play"),
                }));
            }
        }

        let pb = ProgressBar::new(artists_data.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        for artist_data in artists_data {
            match self.make_request("POST", "/api/artists", Some(artist_data.clone())).await {
                Ok(artist) => self.created_objects.artists.push(artist),
                Err(err) => pb.println(format!(
                    "{} Skipping artist {}: {err}",
                    style("!").yellow(),
                    artist_data["name"]
                )),
            }
            pb.inc(1);
        }
        pb.finish_with_message("artists created");

        println!(
            "{} Created {} artists",
            style("ok").green(),
            self.created_objects.artists.len()
        );
        Ok(())
    }

    pub async fn create_shows(&mut self, count: usize) -> Result<()> {
        println!("{} Creating shows...", style("[3/3]").bold().dim());

        if self.created_objects.venues.is_empty() || self.created_objects.artists.is_empty() {
            bail!("Cannot create shows without venues and artists");
        }

        // A mix of past and upcoming shows, spread over four months
        let mut shows_data = Vec::new();
        {
            let mut rng = rand::rng();
            for _ in 0..count {
                let venue = &self.created_objects.venues[rng.random_range(0..self.created_objects.venues.len())];
                let artist = &self.created_objects.artists[rng.random_range(0..self.created_objects.artists.len())];
                let days_offset = rng.random_range(-60i64..60);
                let start_time = Utc::now()
                    + Duration::days(days_offset)
                    + Duration::hours(rng.random_range(18..23));

                shows_data.push(json!({
                    "start_time": start_time.to_rfc3339(),
                    "venue_id": venue["id"],
                    "artist_id": artist["id"],
                }));
            }
        }

        let pb = ProgressBar::new(shows_data.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        // Shows are independent of each other, create them concurrently
        let requests = shows_data
            .iter()
            .map(|show_data| self.make_request("POST", "/api/shows", Some(show_data.clone())));
        let results = join_all(requests).await;

        for result in results {
            match result {
                Ok(show) => self.created_objects.shows.push(show),
                Err(err) => pb.println(format!("{} Skipping show: {err}", style("!").yellow())),
            }
            pb.inc(1);
        }
        pb.finish_with_message("shows created");

        println!(
            "{} Created {} shows",
            style("ok").green(),
            self.created_objects.shows.len()
        );
        Ok(())
    }

    pub async fn seed_database(&mut self, show_count: usize) -> Result<()> {
        self.test_connection().await?;
        self.create_venues().await?;
        self.create_artists().await?;
        self.create_shows(show_count).await?;
        self.display_summary();
        Ok(())
    }

    fn display_summary(&self) {
        println!();
        println!("{}", style("Database Seeding Complete!").bold().green());
        println!("{}", style("=".repeat(40)).dim());

        let summary_data = vec![
            ("Venues", self.created_objects.venues.len()),
            ("Artists", self.created_objects.artists.len()),
            ("Shows", self.created_objects.shows.len()),
        ];

        for (name, count) in summary_data {
            println!("{:.<20} {}", style(name).cyan(), style(count).bold().green());
        }

        println!();
        println!(
            "Browse the data at {}/api/docs",
            style(&self.config.base_url).cyan()
        );
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Showtime Database Seeder")
        .version("1.0")
        .about("Seeds a Showtime API instance with realistic venues, artists and shows")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .value_name("JWT_TOKEN")
                .help("JWT authentication token for protected instances"),
        )
        .arg(
            Arg::new("shows")
                .short('s')
                .long("shows")
                .value_name("COUNT")
                .help("Number of shows to create")
                .default_value("20"),
        )
        .get_matches();

    let base_url = matches.get_one::<String>("url").unwrap().clone();
    let jwt_token = matches.get_one::<String>("token").cloned();
    let show_count: usize = matches.get_one::<String>("shows").unwrap().parse()?;

    println!("{}", style("Showtime Database Seeder v1.0").bold());
    println!("{}", style("=".repeat(40)).dim());
    println!("API URL: {}", style(&base_url).cyan());

    let mut seeder = DatabaseSeeder::new(base_url, jwt_token);
    seeder.seed_database(show_count).await?;

    Ok(())
}
