pub mod osu;
pub mod settings;

#[cfg(test)]
mod tests;
