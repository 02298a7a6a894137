//! `orgchart` - command-line client for the structure API. Renders the
//! department tree in a terminal and drives create/update/delete through
//! the same mutation gateway the portal UI uses.

use anyhow::Context;
use clap::{Parser, Subcommand};

use orgchart_api::auth;
use orgchart_api::gateway::MutationGateway;
use orgchart_api::models::{DepartmentId, DepartmentInput, Identity};
use orgchart_api::store::{DepartmentStore, HttpStore, StoreOracle};
use orgchart_api::tree::{build_forest, TreeNode};

#[derive(Parser)]
#[command(name = "orgchart")]
#[command(about = "CLI for the org structure service")]
#[command(version)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "ORGCHART_URL",
        default_value = "http://127.0.0.1:3000",
        help = "Base URL of the orgchart API"
    )]
    url: String,

    #[arg(
        long,
        global = true,
        env = "ORGCHART_TOKEN",
        hide_env_values = true,
        help = "Portal session token"
    )]
    token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the department tree")]
    Tree,

    #[command(about = "List employees (for manager assignment)")]
    Employees,

    #[command(about = "Create a department")]
    Create {
        name: String,
        #[arg(long, help = "Parent department id (omit for a root department)")]
        parent: Option<DepartmentId>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Manager user id")]
        manager: Option<i64>,
    },

    #[command(about = "Update a department (unset flags keep current values)")]
    Update {
        id: DepartmentId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        parent: Option<DepartmentId>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        manager: Option<i64>,
    },

    #[command(about = "Delete a department (children move up one level)")]
    Delete { id: DepartmentId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let token = cli
        .token
        .clone()
        .context("no session token; set ORGCHART_TOKEN or pass --token")?;
    let store = HttpStore::new(cli.url.clone(), token.clone());

    match cli.command {
        Commands::Tree => {
            let departments = store.list_departments().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&departments)?);
            } else if departments.is_empty() {
                println!("No departments yet.");
            } else {
                let forest = build_forest(&departments);
                for root in &forest {
                    print_subtree(root, "", true, true);
                }
            }
        }
        Commands::Employees => {
            let employees = store.list_identities().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&employees)?);
            } else {
                for emp in &employees {
                    println!(
                        "{:>6}  {}  <{}>  {}{}",
                        emp.id,
                        emp.display_name(),
                        emp.email,
                        emp.role.as_str(),
                        if emp.can_manage_structure {
                            "  [structure admin]"
                        } else {
                            ""
                        }
                    );
                }
            }
        }
        Commands::Create {
            ref name,
            parent,
            ref description,
            manager,
        } => {
            let acting = acting_identity(&token)?;
            let gateway = MutationGateway::new(store.clone(), StoreOracle::new(store.clone()));
            let input = DepartmentInput {
                name: name.clone(),
                description: description.clone(),
                parent_id: parent,
                manager_user_id: manager,
            };
            let id = gateway.create_department(input, &acting).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true, "id": id }));
            } else {
                println!("✓ Created department {} ({})", name, id);
            }
        }
        Commands::Update {
            id,
            ref name,
            parent,
            ref description,
            manager,
        } => {
            let acting = acting_identity(&token)?;
            let current = store.get_department(id).await?;
            let gateway = MutationGateway::new(store.clone(), StoreOracle::new(store.clone()));
            // PUT is full-replace; fill unset flags from the current row
            let input = DepartmentInput {
                name: name.clone().unwrap_or(current.name),
                description: description.clone().or(current.description),
                parent_id: parent.or(current.parent_id),
                manager_user_id: manager.or(current.manager_user_id),
            };
            gateway.update_department(id, input, &acting).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("✓ Updated department {}", id);
            }
        }
        Commands::Delete { id } => {
            let acting = acting_identity(&token)?;
            let gateway = MutationGateway::new(store.clone(), StoreOracle::new(store.clone()));
            gateway.delete_department(id, &acting).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "ok": true }));
            } else {
                println!("✓ Deleted department {}", id);
            }
        }
    }

    Ok(())
}

/// Who the CLI acts as, read from the session token. Client-side only; the
/// server verifies the real signature on every request.
fn acting_identity(token: &str) -> anyhow::Result<Identity> {
    let claims = auth::peek_claims(token).context("could not read session token claims")?;
    Ok(Identity::from(claims))
}

fn print_subtree(node: &TreeNode, prefix: &str, is_last: bool, is_root: bool) {
    let manager = node
        .department
        .manager_email
        .as_deref()
        .map(|m| format!("  ({})", m))
        .unwrap_or_default();

    if is_root {
        println!("{} [{}]{}", node.name(), node.id(), manager);
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        println!("{}{}{} [{}]{}", prefix, branch, node.name(), node.id(), manager);
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        format!("{}{}", prefix, if is_last { "    " } else { "│   " })
    };

    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == node.children.len();
        print_subtree(child, &child_prefix, last, false);
    }
}
