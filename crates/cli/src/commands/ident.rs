use anyhow::Result;
use pbxsync_core::ident::Identifier;

/// Identifier for `seed`, optionally role-marked as `"{role}-{seed}"`.
pub fn identifier_for(seed: &str, role: Option<&str>) -> Identifier {
    match role {
        Some(role) => Identifier::for_seed(&format!("{role}-{seed}")),
        None => Identifier::for_seed(seed),
    }
}

/// Print the identifier generated for `seed`.
pub fn id_command(seed: &str, role: Option<&str>) -> Result<()> {
    println!("{}", identifier_for(seed, role));
    Ok(())
}
