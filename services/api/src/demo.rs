use crate::infra::{build_service, FoodService};
use clap::Args;
use food_lens::config::CatalogConfig;
use food_lens::error::AppError;
use food_lens::food::{
    Barcode, CandidateGroup, FoodRecord, FoodServiceError, Nutrition, ProductView, ScoredFood,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// CSV or Open Food Facts JSON export to load instead of the bundled sample
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

impl CatalogArgs {
    fn config(self) -> CatalogConfig {
        CatalogConfig {
            path: self.catalog,
            ..CatalogConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Barcode to look up and score
    pub(crate) barcode: String,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    /// Print the full product view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Text matched against product name, brand and category
    pub(crate) query: String,
    /// Label filter: all, vegan, vegetarian, organic or gluten-free
    #[arg(long)]
    pub(crate) label: Option<String>,
    /// Profile flag to enable, may repeat (e.g. --flag vegan --flag lowSugar)
    #[arg(long = "flag")]
    pub(crate) flags: Vec<String>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        barcode,
        catalog,
        json,
    } = args;
    let service = build_service(&catalog.config())?;

    match service.product(&Barcode::new(barcode.as_str())) {
        Ok(view) if json => match serde_json::to_string_pretty(&view) {
            Ok(payload) => println!("{}", payload),
            Err(err) => println!("Product view unavailable: {}", err),
        },
        Ok(view) => render_product(&view),
        Err(err) => println!("Lookup failed for {}: {}", barcode, err),
    }
    Ok(())
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        query,
        label,
        flags,
        catalog,
    } = args;
    let service = build_service(&catalog.config())?;

    let session = match start_session_with(&service, &flags) {
        Ok(session) => session,
        Err(err) => {
            println!("Profile session unavailable: {}", err);
            return Ok(());
        }
    };

    match service.search(&query, label.as_deref(), Some(&session)) {
        Ok(results) => {
            println!(
                "Search '{}' (label: {}, ranking: {:?})",
                results.query,
                results.label.as_str(),
                results.ranking
            );
            render_scored(&results.results);
        }
        Err(err) => println!("Search failed: {}", err),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(&args.catalog.config())?;

    println!("Food health scoring demo");
    for barcode in ["737628064502", "011110038364"] {
        match service.product(&Barcode::new(barcode)) {
            Ok(view) => render_product(&view),
            Err(err) => println!("  {}: {}", barcode, err),
        }
    }

    println!("\nProfile: vegan, reduce sugar, increase fiber");
    let flags = ["vegan", "lowSugar", "highFiber"].map(str::to_string);
    let session = match start_session_with(&service, &flags) {
        Ok(session) => session,
        Err(err) => {
            println!("  Profile session unavailable: {}", err);
            return Ok(());
        }
    };

    match service.search("cereal", None, Some(&session)) {
        Ok(results) => render_scored(&results.results),
        Err(err) => println!("  Search unavailable: {}", err),
    }

    match service.recommendations(&session) {
        Ok(groups) if groups.is_empty() => println!("\nRecommendations: none"),
        Ok(groups) => render_groups(&groups),
        Err(err) => println!("\nRecommendations unavailable: {}", err),
    }

    if let Err(err) = service.end_session(&session) {
        println!("Session cleanup failed: {}", err);
    }
    Ok(())
}

fn start_session_with(
    service: &FoodService,
    flags: &[String],
) -> Result<food_lens::food::SessionId, FoodServiceError> {
    let session = service.start_session()?;
    for flag in flags {
        service.toggle(&session.session_id, flag)?;
    }
    Ok(session.session_id)
}

fn render_product(view: &ProductView) {
    let score = &view.assessment.score;
    println!(
        "\n{} ({}) [{}]",
        view.food.name,
        view.food.brand,
        view.food.barcode
    );
    println!(
        "  Overall {} (grade {}) | inflammation {} | gut health {} | nutrient density {} | processing {}",
        score.overall,
        view.grade.label(),
        score.inflammation,
        score.gut_health,
        score.nutrient_density,
        score.processing
    );
    for adjustment in &view.assessment.adjustments {
        println!("  {:+} {:?}: {}", adjustment.delta, adjustment.dimension, adjustment.notes);
    }
    if view.alternatives.is_empty() {
        println!("  Alternatives: none");
    } else {
        println!("  Alternatives:");
        for alternative in &view.alternatives {
            println!(
                "  - {} (overall {}): {}",
                alternative.name, alternative.health_score.overall, alternative.reason
            );
        }
    }
}

fn render_scored(results: &[ScoredFood]) {
    if results.is_empty() {
        println!("  No products passed the profile filters");
        return;
    }
    for entry in results {
        println!(
            "  {:<28} overall {:>3} ({}) sugar {} fiber {}",
            entry.food.name,
            entry.health_score.overall,
            entry.grade.label(),
            grams(entry.food.nutrition.sugar),
            grams(entry.food.nutrition.fiber)
        );
    }
}

fn render_groups(groups: &[CandidateGroup]) {
    for group in groups {
        println!("\n{}", group.title);
        render_scored(&group.products);
    }
}

fn grams(value: Option<f64>) -> String {
    value
        .map(|amount| format!("{amount:.1}g"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn product(
    barcode: &str,
    name: &str,
    brand: &str,
    category: &str,
    ingredients: &[&str],
    additives: &[&str],
    nutrition: Nutrition,
) -> FoodRecord {
    let mut record = FoodRecord::new(barcode, name);
    record.brand = brand.to_string();
    record.category = category.to_string();
    record.ingredients = ingredients.iter().map(|value| value.to_string()).collect();
    record.additives = additives.iter().map(|value| value.to_string()).collect();
    record.nutrition = nutrition;
    record
}

/// Bundled products used when no catalog export is configured.
pub(crate) fn sample_products() -> Vec<FoodRecord> {
    let mut quinoa = product(
        "737628064502",
        "Organic Quinoa",
        "Ancient Harvest",
        "Grains",
        &["organic quinoa"],
        &[],
        Nutrition {
            calories: Some(120.0),
            protein: Some(4.0),
            carbs: Some(21.0),
            fat: Some(2.0),
            fiber: Some(0.0),
            sugar: Some(0.0),
            sodium: Some(10.0),
        },
    );
    quinoa.diet_tags = tags(&["en:vegan", "en:vegetarian"]);
    quinoa.label_tags = tags(&["en:organic", "en:gluten-free"]);

    let mut chips = product(
        "011110038364",
        "Processed Snack Chips",
        "Crunchy Co",
        "Snacks",
        &["corn", "vegetable oil", "salt"],
        &["MSG", "artificial color"],
        Nutrition {
            calories: Some(160.0),
            protein: Some(2.0),
            carbs: Some(15.0),
            fat: Some(10.0),
            fiber: Some(0.0),
            sugar: Some(1.0),
            sodium: Some(180.0),
        },
    );
    chips.diet_tags = tags(&["en:vegan"]);

    let mut bran = product(
        "038000199707",
        "Bran Flakes",
        "Morning Mill",
        "Breakfast cereals",
        &["whole grain wheat", "wheat bran", "sugar", "salt"],
        &[],
        Nutrition {
            protein: Some(10.0),
            fiber: Some(12.0),
            sugar: Some(14.0),
            sodium: Some(450.0),
            ..Nutrition::default()
        },
    );
    bran.diet_tags = tags(&["en:vegan"]);
    bran.allergen_tags = tags(&["en:gluten"]);

    let mut oats = product(
        "039978003157",
        "Gluten Free Rolled Oats",
        "Morning Mill",
        "Breakfast cereals",
        &["whole grain oats"],
        &[],
        Nutrition {
            protein: Some(13.0),
            fiber: Some(10.0),
            sugar: Some(1.0),
            sodium: Some(5.0),
            ..Nutrition::default()
        },
    );
    oats.diet_tags = tags(&["en:vegan"]);
    oats.label_tags = tags(&["en:gluten-free", "en:organic"]);

    let mut rings = product(
        "016000275287",
        "Frosted Rings",
        "Sweet Co",
        "Breakfast cereals",
        &["corn flour", "sugar", "high fructose corn syrup", "vegetable oil"],
        &["e102", "e129", "e320"],
        Nutrition {
            protein: Some(3.0),
            fiber: Some(1.0),
            sugar: Some(38.0),
            sodium: Some(600.0),
            ..Nutrition::default()
        },
    );
    rings.diet_tags = tags(&["en:vegetarian"]);
    rings.allergen_tags = tags(&["en:gluten"]);

    let mut trail_mix = product(
        "5000159484695",
        "Omega Trail Mix",
        "Seed Co",
        "Snacks",
        &["walnuts", "flax seeds", "raisins"],
        &[],
        Nutrition {
            protein: Some(15.0),
            fiber: Some(7.5),
            sugar: Some(4.0),
            sodium: Some(20.0),
            ..Nutrition::default()
        },
    );
    trail_mix.diet_tags = tags(&["en:vegan"]);
    trail_mix.allergen_tags = tags(&["en:nuts"]);

    vec![quinoa, chips, bran, oats, rings, trail_mix]
}
