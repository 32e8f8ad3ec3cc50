use crate::core::errors::Result;
use crate::core::services::substitution_cipher::SubstitutionCipher;

/// Execute `shopkeeper encrypt <text…>`.
///
/// Prints only the result so the output can be piped.
pub fn encrypt(text: &[String]) -> Result<()> {
    println!("{}", SubstitutionCipher::default().encrypt(&text.join(" ")));
    Ok(())
}

/// Execute `shopkeeper decrypt <text…>`.
pub fn decrypt(text: &[String]) -> Result<()> {
    println!("{}", SubstitutionCipher::default().decrypt(&text.join(" ")));
    Ok(())
}
