mod option;
mod vector;
mod writer;
