use std::path::Path;

use colored::Colorize;
use lsq_core::{Catalog, CatalogError};

pub fn run(file: &Path) -> Result<(), String> {
    let catalog = match Catalog::load(file) {
        Ok(catalog) => catalog,
        Err(CatalogError::Invalid(issues)) => {
            let errors = issues.iter().filter(|i| i.is_error).count();
            for issue in &issues {
                if issue.is_error {
                    eprintln!("  {}", issue.to_string().red());
                } else {
                    eprintln!("  {}", issue.to_string().yellow());
                }
            }
            return Err(format!(
                "{errors} error{} in {}",
                if errors == 1 { "" } else { "s" },
                file.display()
            ));
        }
        Err(e) => return Err(e.to_string()),
    };

    for warning in catalog.warnings() {
        eprintln!("  {}", warning.to_string().yellow());
    }
    println!("  All checks passed for '{}'.", file.display());
    println!(
        "  {} missions, {} scenarios",
        catalog.mission_count(),
        catalog.scenarios().len()
    );

    Ok(())
}
