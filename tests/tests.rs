mod controller;
mod lookup;
