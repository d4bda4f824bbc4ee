mod flags;
mod token;
