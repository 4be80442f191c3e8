pub mod champions_loader;
