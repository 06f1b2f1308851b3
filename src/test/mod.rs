mod channel;
mod properties;
mod receiver;
mod sim_time;
