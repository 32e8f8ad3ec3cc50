use colored::Colorize;

use crate::cli::ShopAction;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::actor::Actor;
use crate::core::models::shop::{MentionField, Shop, ShopUpdate};

/// Execute a `shopkeeper shop <action>` command against the data directory.
///
/// Mutations are recorded in the audit log as the local operator.
pub fn execute(action: &ShopAction) -> Result<()> {
    let config = AppConfig::load(context::data_dir())?;
    let service = context::file_service(&config);
    let actor = Actor::local();

    match action {
        ShopAction::Create { name, tier } => {
            let shop = service.create_shop(&actor, name, tier)?;
            output::success(&format!("Created shop #{} '{}' ({})", shop.id, shop.name, shop.tier));
            print_counters(&shop);
        }
        ShopAction::List => {
            let shops = service.list_shops()?;
            if shops.is_empty() {
                output::header("shopkeeper shops");
                output::warning("No shops yet");
                println!("  Create one with 'shopkeeper shop create --name <NAME> --type GOLD'.");
                return Ok(());
            }
            output::header(&format!("shopkeeper shops ({})", shops.len()));
            println!();
            for shop in &shops {
                print_row(shop);
            }
        }
        ShopAction::Show { id } => {
            let shop = service.get_shop(*id)?;
            output::header(&format!("#{} {} ({})", shop.id, shop.name, shop.tier));
            print_counters(&shop);
        }
        ShopAction::Use { id, field, amount } => {
            let field: MentionField = field.parse()?;
            let remaining = service.use_mention(&actor, *id, field, *amount)?;
            output::success(&format!("Used {amount} {field} on shop #{id}, {remaining} left"));
        }
        ShopAction::Renew { id } => {
            let shop = service.renew_mentions(&actor, *id)?;
            output::success(&format!("Renewed mentions for '{}'", shop.name));
            print_counters(&shop);
        }
        ShopAction::Update { id, name, tier } => {
            if name.is_none() && tier.is_none() {
                output::warning("Nothing to update, pass --name and/or --type");
                return Ok(());
            }
            let update = ShopUpdate {
                name: name.clone(),
                tier: tier.clone(),
            };
            let shop = service.update_shop(&actor, *id, &update)?;
            output::success(&format!("Updated shop #{} '{}' ({})", shop.id, shop.name, shop.tier));
        }
        ShopAction::Delete { id } => {
            if service.delete_shop(&actor, *id)? {
                output::success(&format!("Deleted shop #{id}"));
            } else {
                output::warning(&format!("Shop #{id} does not exist, nothing deleted"));
            }
        }
    }
    Ok(())
}

fn print_counters(shop: &Shop) {
    for field in MentionField::ALL {
        println!("    {:<16} {}", field.as_str(), shop.counter(field));
    }
}

fn print_row(shop: &Shop) {
    println!(
        "  {:>4} {} {:<20} {:<9} {} {:>6} {:>6} {:>6}",
        format!("#{}", shop.id).dimmed(),
        "│".dimmed(),
        shop.name,
        shop.tier.to_string().cyan(),
        "│".dimmed(),
        shop.mention_everyone,
        shop.mention_here,
        shop.mention_stores,
    );
}
