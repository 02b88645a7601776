use crate::infra::{seeded_directory, InMemoryDonationStore, InMemoryTransitionJournal};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use foodbridge::donations::{
    Actor, ActorId, Category, DonationDraft, DonationEngine, Quantity, QuantityUnit,
};
use foodbridge::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting date for expiry highlighting (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the per-role feed listing at the end of the demo
    #[arg(long)]
    pub(crate) skip_feeds: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let directory = seeded_directory();
    let engine = DonationEngine::new(
        Arc::new(InMemoryDonationStore::default()),
        Arc::new(directory.clone()),
        Arc::new(InMemoryTransitionJournal::default()),
    );

    let (Some(producer), Some(distributor), Some(rival), Some(cook)) = (
        demo_actor(&directory, "prod-1"),
        demo_actor(&directory, "dist-1"),
        demo_actor(&directory, "dist-2"),
        demo_actor(&directory, "cook-1"),
    ) else {
        println!("  Demo directory is missing a seeded actor");
        return Ok(());
    };

    println!("Donation lifecycle demo (dates relative to {today})");

    let tomatoes = match engine.create(
        &producer,
        draft(
            "Organic tomatoes",
            "Fresh from this morning's harvest.",
            Category::Vegetable,
            15,
            QuantityUnit::Kg,
            today,
            today + Duration::days(2),
        ),
    ) {
        Ok(record) => record,
        Err(err) => {
            println!("  Create rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} published {} ({}) -> {}",
        producer.display_name, tomatoes.title, tomatoes.quantity, tomatoes.status
    );

    if let Ok(apples) = engine.create(
        &producer,
        draft(
            "Gala apples",
            "Sweet and crisp, good for another week.",
            Category::Fruit,
            8,
            QuantityUnit::Boxes,
            today - Duration::days(1),
            today + Duration::days(6),
        ),
    ) {
        println!(
            "- {} published {} ({}) -> {}",
            producer.display_name, apples.title, apples.quantity, apples.status
        );
    }

    let claimed = match engine.claim(&distributor, &tomatoes.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Claim rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} collected {} -> {}",
        distributor.display_name, claimed.title, claimed.status
    );

    match engine.claim(&rival, &tomatoes.id) {
        Ok(_) => println!("  Unexpected: rival claim succeeded"),
        Err(err) => println!("- {} lost the race: {err}", rival.display_name),
    }

    let delivered = match engine.assign(&distributor, &tomatoes.id, &cook.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Assignment rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} delivered {} to {} -> {}",
        distributor.display_name, delivered.title, cook.display_name, delivered.status
    );

    println!("\nDashboard counters");
    for actor in [&producer, &distributor, &cook] {
        match engine.stats(actor) {
            Ok(counters) => {
                let summary: Vec<String> = counters
                    .iter()
                    .map(|(counter, value)| format!("{}={value}", counter.label()))
                    .collect();
                println!("- {} ({}): {}", actor.display_name, actor.role, summary.join(", "));
            }
            Err(err) => println!("- {}: counters unavailable ({err})", actor.display_name),
        }
    }

    println!("\nTransition history");
    for actor in [&producer, &distributor, &cook] {
        match engine.history(actor, 10) {
            Ok(entries) if entries.is_empty() => {
                println!("- {}: no recorded transitions", actor.display_name)
            }
            Ok(entries) => {
                for entry in entries {
                    println!(
                        "- {}: {} {}",
                        actor.display_name,
                        entry.action.label(),
                        entry.donation_id
                    );
                }
            }
            Err(err) => println!("- {}: history unavailable ({err})", actor.display_name),
        }
    }

    if args.skip_feeds {
        return Ok(());
    }

    println!("\nRole-scoped feeds");
    for actor in [&producer, &distributor, &cook] {
        match engine.feed(actor) {
            Ok(records) => {
                println!("- {} ({}) sees {} record(s):", actor.display_name, actor.role, records.len());
                for record in records {
                    let expiry_note = if record.expiring_soon(today) {
                        format!(" [expires in {} day(s)]", record.days_until_expiry(today))
                    } else {
                        String::new()
                    };
                    println!("    {} -> {}{}", record.title, record.status, expiry_note);
                }
            }
            Err(err) => println!("- {}: feed unavailable ({err})", actor.display_name),
        }
    }

    Ok(())
}

fn demo_actor(directory: &crate::infra::InMemoryActorDirectory, id: &str) -> Option<Actor> {
    use foodbridge::donations::ActorDirectory;
    directory.find(&ActorId(id.to_string()))
}

fn draft(
    title: &str,
    description: &str,
    category: Category,
    value: u32,
    unit: QuantityUnit,
    harvest_date: NaiveDate,
    expiry_date: NaiveDate,
) -> DonationDraft {
    DonationDraft {
        title: title.to_string(),
        description: description.to_string(),
        category,
        quantity: Quantity { value, unit },
        harvest_date,
        expiry_date,
    }
}
