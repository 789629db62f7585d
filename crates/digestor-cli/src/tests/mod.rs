mod tests_args;
